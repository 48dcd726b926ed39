pub mod schedule_handler;
