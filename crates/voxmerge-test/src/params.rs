//! Regression test parameters and comparisons

use crate::error::{TestError, TestResult};

/// Regression test parameters
///
/// Tracks the state of a regression test: the test name, the index of the
/// current comparison and every failure recorded so far. Comparisons never
/// panic, so one run reports all mismatches at once.
pub struct RegParams {
    /// Name of the test (e.g., "merge_graph")
    pub test_name: String,
    /// Current comparison index (incremented before each comparison)
    index: usize,
    /// Overall success status
    success: bool,
    /// Recorded failures
    failures: Vec<String>,
}

impl RegParams {
    /// Create new regression test parameters
    pub fn new(test_name: &str) -> Self {
        eprintln!();
        eprintln!("////////////////////////////////////////////////");
        eprintln!("////////////////   {}_reg   ///////////////", test_name);
        eprintln!("////////////////////////////////////////////////");

        Self {
            test_name: test_name.to_string(),
            index: 0,
            success: true,
            failures: Vec::new(),
        }
    }

    /// Get the current comparison index
    pub fn index(&self) -> usize {
        self.index
    }

    fn fail(&mut self, msg: String) {
        eprintln!("{}", msg);
        self.failures.push(msg);
        self.success = false;
    }

    /// Compare two floating-point values
    ///
    /// # Arguments
    ///
    /// * `expected` - Expected value
    /// * `actual` - Actual computed value
    /// * `delta` - Maximum allowed difference
    ///
    /// # Returns
    ///
    /// `true` if values match within delta, `false` otherwise.
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        self.index += 1;
        let diff = (expected - actual).abs();

        // NaN differences never match
        if !(diff <= delta) {
            self.fail(format!(
                "Failure in {}_reg: value comparison for index {}\n\
                 difference = {} but allowed delta = {}\n\
                 expected = {}, actual = {}",
                self.test_name, self.index, diff, delta, expected, actual
            ));
            false
        } else {
            true
        }
    }

    /// Check that a condition holds
    pub fn check(&mut self, condition: bool, what: &str) -> bool {
        self.index += 1;
        if !condition {
            self.fail(format!(
                "Failure in {}_reg: check for index {} - {}",
                self.test_name, self.index, what
            ));
        }
        condition
    }

    /// Compare two strings for exact equality
    pub fn compare_strings(&mut self, expected: &str, actual: &str) -> bool {
        self.index += 1;

        if expected != actual {
            self.fail(format!(
                "Failure in {}_reg: string comparison for index {}\n\
                 expected:\n{}\nactual:\n{}",
                self.test_name, self.index, expected, actual
            ));
            false
        } else {
            true
        }
    }

    /// Check if all comparisons have passed so far
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Get list of failures
    pub fn failures(&self) -> &[String] {
        &self.failures
    }

    /// Report results
    ///
    /// # Returns
    ///
    /// `true` if all comparisons passed, `false` if any failed.
    pub fn cleanup(self) -> bool {
        self.into_result().is_ok()
    }

    /// Report results as a `Result`
    pub fn into_result(self) -> TestResult<()> {
        if self.success {
            eprintln!("SUCCESS: {}_reg", self.test_name);
            eprintln!();
            Ok(())
        } else {
            eprintln!("FAILURE: {}_reg", self.test_name);
            for failure in &self.failures {
                eprintln!("  {}", failure);
            }
            eprintln!();
            Err(TestError::Failed {
                test: self.test_name,
                count: self.failures.len(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_values_success() {
        let mut rp = RegParams::new("test");
        assert!(rp.compare_values(100.0, 100.0, 0.0));
        assert!(rp.is_success());
    }

    #[test]
    fn test_compare_values_within_delta() {
        let mut rp = RegParams::new("test");
        assert!(rp.compare_values(100.0, 100.5, 1.0));
        assert!(rp.is_success());
    }

    #[test]
    fn test_compare_values_failure() {
        let mut rp = RegParams::new("test");
        assert!(!rp.compare_values(100.0, 200.0, 0.0));
        assert!(!rp.compare_values(1.0, f64::NAN, 10.0));
        assert!(!rp.is_success());
        assert_eq!(rp.failures().len(), 2);
        assert_eq!(rp.index(), 2);
    }

    #[test]
    fn test_compare_strings_and_check() {
        let mut rp = RegParams::new("test");
        assert!(rp.compare_strings("a\nb", "a\nb"));
        assert!(rp.check(true, "always holds"));
        assert!(!rp.check(false, "never holds"));
        assert!(matches!(
            rp.into_result(),
            Err(TestError::Failed { count: 1, .. })
        ));
    }
}
