mod comment;

pub use comment::{CommentWithAuthor, RecentComment, COMMENT_WITH_AUTHOR_SELECT};
