mod visit;

pub use visit::{
    normalize_ip, VisitContext, VisitCounts, VisitMetadata, VisitorLogWithUser,
    MAX_LOGGED_PATH_CHARS,
};
