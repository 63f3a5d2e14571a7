// Member domain - local mirror of identity-provider accounts

pub mod models;
