pub mod ast;
pub mod cli;
pub mod lexer;
pub mod output;
pub mod parser;

pub use ast::{
    create_node, release, AssignOp, Ast, BuildError, NodeKind, NodeType, ReleaseStats, Token,
};
pub use lexer::{LexError, Lexer, TokenSource, TokenStream};
pub use output::{to_json, to_json_pretty};
pub use parser::{parse_rule, parse_rule_with, ErrorKind, ParseError, ParseOptions, Parser};
