//! Run options for processing block documents.
//!
//! `RunOptions` selects which checks run on each document besides hashing.
//! The binary builds it from command-line flags.

/// Which optional checks and outputs apply to each processed document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Compare each block's claimed `hash` with the computed one.
    pub verify: bool,
    /// Include the canonical encoding in the report.
    pub include_canonical: bool,
    /// Require the digest to meet the block's own difficulty.
    pub check_work: bool,
    /// Require positive, balanced transaction amounts.
    pub check_transactions: bool,
}

impl RunOptions {
    /// Create options.
    pub fn new(
        verify: bool,
        include_canonical: bool,
        check_work: bool,
        check_transactions: bool,
    ) -> Self {
        Self {
            verify,
            include_canonical,
            check_work,
            check_transactions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_only_hashes() {
        let opts = RunOptions::default();
        assert!(!opts.verify);
        assert!(!opts.include_canonical);
        assert!(!opts.check_work);
        assert!(!opts.check_transactions);
        assert_eq!(RunOptions::new(false, false, false, false), opts);
    }
}
