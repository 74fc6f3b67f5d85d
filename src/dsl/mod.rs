pub mod model;
pub mod parser;
pub mod prompt;
pub mod validator;
