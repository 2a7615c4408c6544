//! Administrator commands (`bt ...`)

mod dispatcher;
mod parser;
mod suggest;

pub use dispatcher::{CommandDispatcher, CommandReply, ReplyKind};
pub use parser::{
    help_lines, parse_command, split_line, AdminCommand, ListTarget, ParseError, WhitelistAction,
};
pub use suggest::{suggest, DURATION_SUGGESTIONS, REASON_SUGGESTIONS};
