mod client;
mod error;
mod flow;
mod helpers;
