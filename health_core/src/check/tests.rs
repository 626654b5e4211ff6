#[cfg(test)]
mod tests {
    use crate::check::{Check, CheckConfig, Severity};
    use crate::error::HealthError;
    use crate::log::MemoryLog;
    use crate::test_support::{check_config, ProbeSwitch};
    use crate::validation::validate_health_check;
    use std::sync::Arc;
    use std::time::Duration;

    fn stopped_check(config: &CheckConfig, switch: &ProbeSwitch, log: Arc<MemoryLog>) -> Check {
        let check = Check::new(config, switch.probe(), log).unwrap();
        check.stop().unwrap();
        check
    }

    #[tokio::test]
    async fn test_new_check_is_scheduled_and_ok() {
        let switch = ProbeSwitch::new();
        let check = Check::new(&check_config("mock-id", 1), switch.probe(), Arc::new(MemoryLog::new())).unwrap();

        assert!(check.is_scheduled());
        let snapshot = check.to_snapshot();
        assert!(snapshot.ok);
        assert_eq!(snapshot.check_output, "");
        assert_eq!(snapshot.severity, Severity::High);

        check.stop().unwrap();
    }

    #[tokio::test]
    async fn test_first_attempt_fires_immediately() {
        let switch = ProbeSwitch::new();
        let check = Check::new(&check_config("mock-id", 1), switch.probe(), Arc::new(MemoryLog::new())).unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(switch.calls(), 1);
        assert_eq!(check.status().check_output, "mock output");
        check.stop().unwrap();
    }

    #[tokio::test]
    async fn test_repeats_every_interval() {
        let switch = ProbeSwitch::new();
        let config = check_config("mock-id", 1).with_interval(Duration::from_millis(40));
        let check = Check::new(&config, switch.probe(), Arc::new(MemoryLog::new())).unwrap();

        tokio::time::sleep(Duration::from_millis(150)).await;
        check.stop().unwrap();

        assert!(switch.calls() >= 3, "expected repeated attempts, got {}", switch.calls());
    }

    #[tokio::test]
    async fn test_start_twice_is_a_lifecycle_error() {
        let switch = ProbeSwitch::new();
        let check = Check::new(&check_config("mock-id", 1), switch.probe(), Arc::new(MemoryLog::new())).unwrap();

        let error = check.start().unwrap_err();
        assert!(matches!(error, HealthError::Lifecycle(_)));
        assert_eq!(error.to_string(), "The check has already been started");
        check.stop().unwrap();
    }

    #[tokio::test]
    async fn test_stop_and_restart() {
        let switch = ProbeSwitch::new();
        let check = Check::new(&check_config("mock-id", 1), switch.probe(), Arc::new(MemoryLog::new())).unwrap();

        check.stop().unwrap();
        assert!(!check.is_scheduled());

        let error = check.stop().unwrap_err();
        assert!(matches!(error, HealthError::Lifecycle(_)));
        assert_eq!(error.to_string(), "The check has not been started");

        check.start().unwrap();
        assert!(check.is_scheduled());
        check.stop().unwrap();
    }

    #[tokio::test]
    async fn test_clones_share_the_schedule() {
        let switch = ProbeSwitch::new();
        let check = Check::new(&check_config("mock-id", 1), switch.probe(), Arc::new(MemoryLog::new())).unwrap();
        let handle = check.clone();

        handle.stop().unwrap();
        assert!(!check.is_scheduled());
    }

    #[tokio::test]
    async fn test_failed_probe_is_recorded_and_logged() {
        let switch = ProbeSwitch::new();
        let log = Arc::new(MemoryLog::new());
        let check = stopped_check(&check_config("mock-id", 1), &switch, log.clone());

        switch.fail();
        check.run().await;

        let status = check.status();
        assert!(!status.ok);
        assert_eq!(status.check_output, "mock failure");
        assert!(log
            .errors()
            .contains(&"Health check \"mock mock-id\" failed: mock failure".to_string()));

        switch.pass();
        check.run().await;
        let status = check.status();
        assert!(status.ok);
        assert_eq!(status.check_output, "mock output");
    }

    #[tokio::test]
    async fn test_slow_probe_times_out_at_interval() {
        let switch = ProbeSwitch::new();
        let log = Arc::new(MemoryLog::new());
        let config = check_config("mock-id", 1).with_interval(Duration::from_millis(30));
        let check = Check::new(&config, switch.slow_probe(Duration::from_secs(5)), log.clone()).unwrap();
        check.stop().unwrap();

        check.run().await;

        let status = check.status();
        assert!(!status.ok);
        assert_eq!(status.check_output, "timed out");
        assert!(log.errors().iter().any(|line| line.ends_with("failed: timed out")));
    }

    #[tokio::test]
    async fn test_in_flight_attempt_completes_after_stop() {
        let switch = ProbeSwitch::new();
        switch.fail();
        let check = Check::new(
            &check_config("mock-id", 1),
            switch.slow_probe(Duration::from_millis(30)),
            Arc::new(MemoryLog::new()),
        )
        .unwrap();

        tokio::time::sleep(Duration::from_millis(5)).await;
        check.stop().unwrap();
        assert!(check.status().ok);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!check.status().ok);
        assert_eq!(check.status().check_output, "mock failure");
    }

    #[tokio::test]
    async fn test_last_updated_never_decreases() {
        let switch = ProbeSwitch::new();
        let check = stopped_check(&check_config("mock-id", 1), &switch, Arc::new(MemoryLog::new()));

        let mut previous = check.status().last_updated;
        for _ in 0..5 {
            check.run().await;
            let current = check.status().last_updated;
            assert!(current >= previous);
            previous = current;
        }
    }

    #[tokio::test]
    async fn test_set_log_redirects_failures() {
        let switch = ProbeSwitch::new();
        let original = Arc::new(MemoryLog::new());
        let replacement = Arc::new(MemoryLog::new());
        let check = stopped_check(&check_config("mock-id", 1), &switch, original.clone());

        check.set_log(replacement.clone());
        switch.fail();
        check.run().await;

        assert!(original.errors().is_empty());
        assert!(!replacement.errors().is_empty());
    }

    #[tokio::test]
    async fn test_snapshot_passes_output_validation() {
        let switch = ProbeSwitch::new();
        let check = stopped_check(&check_config("mock-id", 3), &switch, Arc::new(MemoryLog::new()));

        validate_health_check(&check.to_snapshot().to_json()).unwrap();
        validate_health_check(&serde_json::to_value(check.to_snapshot()).unwrap()).unwrap();

        switch.fail();
        check.run().await;
        validate_health_check(&check.to_snapshot().to_json()).unwrap();
    }

    #[tokio::test]
    async fn test_describe() {
        let switch = ProbeSwitch::new();
        let check = stopped_check(&check_config("mock-id", 1), &switch, Arc::new(MemoryLog::new()));

        let line = check.describe();
        assert!(line.starts_with("MockCheck [OK] mock mock-id (updated "));
        assert!(line.ends_with("Z)"));

        switch.fail();
        check.run().await;
        assert!(check.describe().starts_with("MockCheck [NOT OK] mock mock-id"));
    }

    #[tokio::test]
    async fn test_invalid_config_is_rejected() {
        let switch = ProbeSwitch::new();
        let config = check_config("Bad Id", 1);

        let error = Check::new(&config, switch.probe(), Arc::new(MemoryLog::new())).unwrap_err();
        assert!(matches!(error, HealthError::Configuration(_)));
        assert_eq!(
            error.to_string(),
            "Invalid option: id must be lowercase and alphanumeric with hyphens"
        );
    }

    #[test]
    fn test_scheduling_requires_a_runtime() {
        let switch = ProbeSwitch::new();
        let error = Check::new(&check_config("mock-id", 1), switch.probe(), Arc::new(MemoryLog::new())).unwrap_err();
        assert!(matches!(error, HealthError::Lifecycle(_)));
    }
}
