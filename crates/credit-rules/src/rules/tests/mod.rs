mod common;
mod codec;
mod conflicts;
mod evaluation;
mod validator;
