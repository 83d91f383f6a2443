// ABOUTME: Integration tests for configuration parsing and the preproduction overlay.
// ABOUTME: Covers defaults, humantime durations, endpoint lists, and environment selection.

use convoy::config::*;
use serde_json::json;
use std::time::Duration;

mod parsing {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = Config::from_yaml("").unwrap();

        assert_eq!(config.deployment_timeout, Duration::from_secs(300));
        assert_eq!(config.deployment_recheck_interval, Duration::from_secs(3));
        assert_eq!(config.healthy_wait_timeout, Duration::from_secs(300));
        assert_eq!(config.healthy_wait_recheck_interval, Duration::from_secs(3));
        assert_eq!(config.environment, "INTEGRATION");
        assert_eq!(config.required_attributes, vec!["id"]);
        assert_eq!(
            config.endpoints.production.first().as_str(),
            "http://localhost:8080"
        );
    }

    #[test]
    fn parse_full_config() {
        let yaml = r#"
deployment_timeout: 10m
deployment_recheck_interval: 5s
healthy_wait_timeout: 2m
healthy_wait_recheck_interval: 1s
request_timeout: 15s
environment: staging
production_environment: prod

endpoints:
  preproduction:
    - http://marathon-staging:8080
  production:
    - http://marathon-a:8080
    - url: http://marathon-b:8080/

deploy_file: marathon/app.yaml
required_env:
  - APPLICATION_NAME

preproduction:
  overrides:
    instances: 2
  env:
    STAGE: "true"
"#;
        let config = Config::from_yaml(yaml).unwrap();

        let timeouts = config.timeouts();
        assert_eq!(timeouts.deployment, Duration::from_secs(600));
        assert_eq!(timeouts.deployment_recheck, Duration::from_secs(5));
        assert_eq!(timeouts.healthy_wait, Duration::from_secs(120));
        assert_eq!(timeouts.healthy_recheck, Duration::from_secs(1));
        assert_eq!(config.request_timeout, Duration::from_secs(15));

        assert_eq!(config.endpoints.production.len(), 2);
        assert_eq!(
            config.endpoints.production.last().as_str(),
            "http://marathon-b:8080"
        );
        assert_eq!(config.required_env, vec!["APPLICATION_NAME"]);
        assert_eq!(config.preproduction.overrides.len(), 1);
        assert_eq!(config.preproduction.env["STAGE"], "true");
    }

    #[test]
    fn zero_recheck_interval_is_rejected() {
        for field in ["deployment_recheck_interval", "healthy_wait_recheck_interval"] {
            let err = Config::from_yaml(&format!("{field}: 0s\n")).unwrap_err();
            assert!(err.to_string().contains(field), "{err}");
        }
    }

    #[test]
    fn default_endpoint_is_localhost() {
        let config = Config::default();
        assert_eq!(
            config.endpoints.preproduction.first().as_str(),
            "http://localhost:8080"
        );
    }

    #[test]
    fn empty_endpoint_list_is_rejected() {
        let yaml = r#"
endpoints:
  production: []
"#;
        assert!(Config::from_yaml(yaml).is_err());
    }

    #[test]
    fn non_http_endpoint_is_rejected() {
        let yaml = r#"
endpoints:
  production:
    - https://marathon:8443
"#;
        assert!(Config::from_yaml(yaml).is_err());
    }
}

mod environments {
    use super::*;

    #[test]
    fn production_match_is_case_insensitive() {
        let config = Config::default();
        assert!(config.is_production("production"));
        assert!(config.is_production("PRODUCTION"));
        assert!(!config.is_production("INTEGRATION"));
    }

    #[test]
    fn endpoints_follow_environment() {
        let yaml = r#"
endpoints:
  preproduction: [http://pre:8080]
  production: [http://prod:8080]
"#;
        let config = Config::from_yaml(yaml).unwrap();

        assert_eq!(config.endpoints_for("PRODUCTION").first().host(), "prod");
        assert_eq!(config.endpoints_for("INTEGRATION").first().host(), "pre");
    }
}

mod overlay {
    use super::*;

    #[test]
    fn caps_values_above_ceiling() {
        let config = Config::default();
        let spec = json!({"id": "foo", "instances": 40, "mem": 256, "cpus": 2.0});

        let overlaid = config.overlay_preproduction(&spec);

        assert_eq!(overlaid["instances"], 20);
        assert_eq!(overlaid["mem"], 256);
        assert_eq!(overlaid["cpus"], 0.1);
        assert_eq!(spec["instances"], 40, "input is untouched");
    }

    #[test]
    fn injects_env_defaults() {
        let config = Config::default();
        let spec = json!({"id": "foo", "env": {"APPLICATION_NAME": "foo", "DATACENTER_NUMBER": "1"}});

        let overlaid = config.overlay_preproduction(&spec);

        assert_eq!(overlaid["env"]["APPLICATION_NAME"], "foo");
        assert_eq!(overlaid["env"]["DATACENTER_NUMBER"], "44");
        assert_eq!(overlaid["env"]["JAVA_XMX"], "128m");
    }

    #[test]
    fn creates_env_when_absent() {
        let config = Config::default();
        let overlaid = config.overlay_preproduction(&json!({"id": "foo"}));

        assert_eq!(overlaid["env"]["JAVA_XMS"], "64m");
    }
}

mod discovery {
    use super::*;
    use std::fs;

    #[test]
    fn discover_without_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::discover(dir.path()).unwrap();
        assert_eq!(config.environment, "INTEGRATION");
    }

    #[test]
    fn discover_reads_dot_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join(".convoy")).unwrap();
        fs::write(
            dir.path().join(".convoy/config.yml"),
            "environment: QA\n",
        )
        .unwrap();

        let config = Config::discover(dir.path()).unwrap();
        assert_eq!(config.environment, "QA");
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(&dir.path().join("nope.yml")).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
