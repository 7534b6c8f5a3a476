mod config;
mod credential_store;
mod guard;
mod paths;
