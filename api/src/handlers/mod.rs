pub(crate) mod friends;
pub(crate) mod posts;
pub(crate) mod users;
