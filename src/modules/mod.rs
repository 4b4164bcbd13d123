pub mod articles;
pub mod auth;
pub mod comments;
pub mod users;

pub use self::articles::model::Article;
pub use self::comments::model::Comment;
pub use self::users::model::User;
