pub mod order_log;
