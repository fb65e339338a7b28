mod common;
mod cycle_test;
mod dispatch_test;
mod persistence_test;
