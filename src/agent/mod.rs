pub mod context;
pub mod query;
pub mod sanitize;
pub mod stream;
pub mod system_prompt;

pub use query::{QueryHandler, QueryOptions};
pub use sanitize::{LinkStripper, ReplyFilter};
pub use stream::{Fragment, FragmentStream, StreamHandler, StreamOptions};
