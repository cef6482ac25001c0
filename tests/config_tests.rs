use blog_engine::{AppConfig, config::Env};
use serial_test::serial;
use std::{env, panic};

// --- Setup/Teardown Utilities ---

/// Utility to run a test function and restore environment variables afterward
fn run_with_env<T, R>(test: T, cleanup_vars: Vec<&'static str>) -> R
where
    T: FnOnce() -> R + panic::UnwindSafe,
{
    // Save current environment variables
    let originals: Vec<(String, Option<String>)> = cleanup_vars
        .iter()
        .map(|&var| (var.to_string(), env::var(var).ok()))
        .collect();

    // Run the test
    let result = panic::catch_unwind(test);

    // Restore original environment variables
    for (key, original_value) in originals.into_iter().rev() {
        unsafe {
            if let Some(val) = original_value {
                env::set_var(&key, val);
            } else {
                env::remove_var(&key);
            }
        }
    }

    // Re-panic if the test failed
    match result {
        Ok(value) => value,
        Err(e) => panic::resume_unwind(e),
    }
}

// --- Tests ---

#[test]
#[serial]
fn test_app_config_production_fail_fast() {
    // Production must refuse to start without an explicit session secret.
    let result = panic::catch_unwind(|| {
        unsafe {
            env::set_var("APP_ENV", "production");
            env::set_var("DATABASE_URL", "sqlite://blog.db");
            env::remove_var("SECRET_KEY");
        }
        AppConfig::load()
    });

    let cleanup_vars = vec!["APP_ENV", "DATABASE_URL", "SECRET_KEY"];
    unsafe {
        for var in cleanup_vars {
            env::remove_var(var);
        }
    }

    assert!(
        result.is_err(),
        "Production config loading should panic on a missing SECRET_KEY"
    );
}

#[test]
#[serial]
fn test_app_config_production_requires_db_url() {
    let result = panic::catch_unwind(|| {
        unsafe {
            env::set_var("APP_ENV", "production");
            env::set_var("SECRET_KEY", "prod-secret");
            env::remove_var("DATABASE_URL");
        }
        AppConfig::load()
    });

    unsafe {
        for var in ["APP_ENV", "SECRET_KEY", "DATABASE_URL"] {
            env::remove_var(var);
        }
    }

    assert!(
        result.is_err(),
        "Production config loading should panic on a missing DATABASE_URL"
    );
}

#[test]
#[serial]
fn test_app_config_local_env_defaults() {
    // Local mode should not panic, and should use hardcoded fallbacks.
    let config = run_with_env(
        || {
            unsafe {
                env::set_var("APP_ENV", "local");
                // Clear variables to exercise the fallbacks.
                env::remove_var("DATABASE_URL");
                env::remove_var("SECRET_KEY");
                env::remove_var("BIND_ADDR");
            }
            AppConfig::load()
        },
        vec!["APP_ENV", "DATABASE_URL", "SECRET_KEY", "BIND_ADDR"],
    );

    assert_eq!(config.env, Env::Local);
    // Check the zero-setup local database default.
    assert_eq!(config.db_url, "sqlite://posts.db");
    // Check the local session secret fallback.
    assert_eq!(config.session_secret, "super-secure-test-secret-value-local");
    assert_eq!(config.bind_addr, "0.0.0.0:3000");
}
