pub mod checker;


pub use checker::{is_good_to_go, CheckEntry, ChecksFn, GoodToGoFn, HealthCheck, HealthCheckOptions};
