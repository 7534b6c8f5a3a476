mod failures;
mod operations;
mod session_header;
