//! Command handlers for the Grounded CLI.

pub mod ask;
pub mod corpus;
pub mod research;
pub mod route;

pub use ask::AskCommand;
pub use corpus::CorpusCommand;
pub use research::ResearchCommand;
pub use route::RouteCommand;
