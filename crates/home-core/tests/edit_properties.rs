//! Behavioural tests for the two I2C edit rules against whole files.
//!
//! These exercise `EditRule` through the crate's public API only, on file
//! contents shaped like the ones shipped with Raspberry Pi OS.

use home_core::{EditOutcome, EditRule};

const STOCK_MODULES: &str = "\
# /etc/modules: kernel modules to load at boot time.
#
# This file contains the names of kernel modules that should be loaded
# at boot time, one per line. Lines beginning with \"#\" are ignored.

";

const STOCK_BOOT_CONFIG: &str = "\
# Uncomment some or all of these to enable the optional hardware interfaces
#dtparam=i2c_arm=on
#dtparam=i2s=on
#dtparam=spi=on
";

fn i2c_modules_rule() -> EditRule {
    EditRule::uncomment("i2c-dev").expect("valid rule")
}

fn i2c_boot_rule() -> EditRule {
    EditRule::uncomment("dtparam=i2c_arm=on").expect("valid rule")
}

#[test]
fn test_modules_with_spi_dev_gets_i2c_dev_appended() {
    let result = i2c_modules_rule().apply("spi-dev\n");
    assert_eq!(result, "spi-dev\ni2c-dev\n");
}

#[test]
fn test_boot_config_commented_directive_is_enabled() {
    let result = i2c_boot_rule().apply("#dtparam=i2c_arm=on\n");
    assert_eq!(result, "dtparam=i2c_arm=on\n");
}

#[test]
fn test_stock_modules_file_ends_with_i2c_dev() {
    // Arrange / Act
    let result = i2c_modules_rule().apply(STOCK_MODULES);

    // Assert: original text is preserved as a prefix.
    assert!(result.starts_with(STOCK_MODULES));
    assert!(result.ends_with("\ni2c-dev\n"));
    assert_eq!(result.lines().filter(|l| *l == "i2c-dev").count(), 1);
}

#[test]
fn test_stock_boot_config_only_touches_i2c_line() {
    // Act
    let result = i2c_boot_rule().apply(STOCK_BOOT_CONFIG);

    // Assert
    assert_eq!(
        result,
        "\
# Uncomment some or all of these to enable the optional hardware interfaces
dtparam=i2c_arm=on
#dtparam=i2s=on
#dtparam=spi=on
"
    );
}

#[test]
fn test_rules_are_independent_of_each_other() {
    // Running the boot rule on a modules file must not enable anything there
    // other than appending its own directive.
    let result = i2c_boot_rule().apply("i2c-dev\n");
    assert_eq!(result, "i2c-dev\ndtparam=i2c_arm=on\n");
}

#[test]
fn test_repeated_runs_converge_after_first() {
    let rule = i2c_modules_rule();
    let mut content = String::from("#i2c-dev\n# i2c-dev\nspi-dev");

    let (first, outcome) = rule.evaluate(&content);
    assert_eq!(outcome, EditOutcome::Changed);
    content = first;

    for _ in 0..5 {
        let (next, outcome) = rule.evaluate(&content);
        assert_eq!(outcome, EditOutcome::Unchanged);
        assert_eq!(next, content);
    }
}
