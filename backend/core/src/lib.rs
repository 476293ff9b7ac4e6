pub mod cancel;
pub mod entity;
pub mod error;
pub mod lookup;

pub use cancel::{cancel_pair, CancelHandle, CancelToken};
pub use entity::{Attachment, Channel, ChannelType, Emoji, ForumTag, Snowflake};
pub use error::ForgeError;
pub use lookup::{PlatformLookup, StaticLookup};
