use thiserror::Error;

pub type Result<T> = std::result::Result<T, MigkitError>;

#[derive(Error, Debug)]
pub enum MigkitError {
    #[error("Git discover error: {0}")]
    GitDiscover(#[from] Box<gix::discover::Error>),
    #[error("Git reference error: {0}")]
    RefFind(#[from] Box<gix::reference::find::existing::Error>),
    #[error("Git object error: {0}")]
    ObjectFind(#[from] Box<gix::object::find::existing::Error>),
    #[error("Git object conversion error: {0}")]
    ObjectFindConv(#[from] Box<gix::object::find::existing::with_conversion::Error>),
    #[error("Git object decode error: {0}")]
    ObjectDecode(#[from] Box<gix::objs::decode::Error>),
    #[error("Git commit error: {0}")]
    Commit(#[from] Box<gix::object::commit::Error>),
    #[error("Git diff error: {0}")]
    DiffTreeToTree(#[from] Box<gix::repository::diff_tree_to_tree::Error>),
    #[error("Invalid timestamp: {0}")]
    InvalidDate(String),
    #[error("Invalid object name '{0}': expected Schema.ObjectName")]
    InvalidObjectName(String),
    #[error("`{command}` exited with code {code}\n{output}")]
    EngineFailed {
        command: String,
        code: i32,
        output: String,
    },
    #[error("Engine '{0}' is not installed or not in PATH")]
    EngineNotFound(String),
    #[error("No requested object matched a detected change")]
    NoMatchingObjects,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

// Manual From implementations for unboxed to boxed conversions
impl From<gix::discover::Error> for MigkitError {
    fn from(err: gix::discover::Error) -> Self {
        MigkitError::GitDiscover(Box::new(err))
    }
}

impl From<gix::reference::find::existing::Error> for MigkitError {
    fn from(err: gix::reference::find::existing::Error) -> Self {
        MigkitError::RefFind(Box::new(err))
    }
}

impl From<gix::object::find::existing::Error> for MigkitError {
    fn from(err: gix::object::find::existing::Error) -> Self {
        MigkitError::ObjectFind(Box::new(err))
    }
}

impl From<gix::object::find::existing::with_conversion::Error> for MigkitError {
    fn from(err: gix::object::find::existing::with_conversion::Error) -> Self {
        MigkitError::ObjectFindConv(Box::new(err))
    }
}

impl From<gix::objs::decode::Error> for MigkitError {
    fn from(err: gix::objs::decode::Error) -> Self {
        MigkitError::ObjectDecode(Box::new(err))
    }
}

impl From<gix::object::commit::Error> for MigkitError {
    fn from(err: gix::object::commit::Error) -> Self {
        MigkitError::Commit(Box::new(err))
    }
}

impl From<gix::repository::diff_tree_to_tree::Error> for MigkitError {
    fn from(err: gix::repository::diff_tree_to_tree::Error) -> Self {
        MigkitError::DiffTreeToTree(Box::new(err))
    }
}
