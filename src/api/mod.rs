pub mod params;
pub mod payload;

pub use params::{
    parse_post_id, CreatePostParams, CreateSessionParams, CreateUserParams, PostId, UpdatePostParams,
    ValidUser,
};
pub use payload::Payload;
