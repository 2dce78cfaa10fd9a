mod static_or_continue;

pub use self::static_or_continue::static_or_continue;
