use statrs::function::gamma::ln_gamma;

/// Exact Poisson probability mass `P(X = k)` for mean `psi`, computed in
/// log space so large counts neither overflow the factorial nor
/// underflow the exponential prematurely.
///
/// A zero mean puts all mass at zero, so `k > 0` yields 0 without any
/// special-cased division.
pub fn poisson_pmf(k: usize, psi: f64) -> f64 {
    if psi <= 0.0 {
        return if k == 0 { 1.0 } else { 0.0 };
    }
    let k_f = k as f64;
    (k_f * psi.ln() - psi - ln_gamma(k_f + 1.0)).exp()
}

/// Scan-statistic p-value for observing `k` reads in some window of size
/// `w` anywhere across `txome_size / w` effective independent tests,
/// under a Poisson null with per-base rate `lambda`.
///
/// Approximation 3.3 of Glaz, Naus & Wallenstein for the unconditional
/// Poisson scan statistic. Overlapping sliding windows are not truly
/// independent tests, so this is a known approximation of the tail
/// probability, kept in this exact form for compatibility.
pub fn scan_pvalue(k: usize, w: u64, txome_size: u64, lambda: f64) -> f64 {
    let l = txome_size as f64 / w as f64;
    let psi = lambda * w as f64;
    let sigma = (k as f64 - 1.0) * (l - 1.0) * poisson_pmf(k, psi);
    (1.0 - (-sigma).exp()).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pmf_matches_direct_computation_for_modest_k() {
        let psi = 3.0_f64;
        // 3^4 * e^-3 / 4!
        let direct = psi.powi(4) * (-psi).exp() / 24.0;
        assert!((poisson_pmf(4, psi) - direct).abs() < 1e-12);
    }

    #[test]
    fn pmf_is_stable_for_large_k() {
        let p = poisson_pmf(10_000, 50.0);
        assert!(p.is_finite());
        assert!(p >= 0.0 && p < 1e-300);
    }

    #[test]
    fn pmf_with_zero_mean_is_zero_for_positive_counts() {
        assert_eq!(poisson_pmf(5, 0.0), 0.0);
        assert_eq!(poisson_pmf(0, 0.0), 1.0);
    }

    #[test]
    fn pvalue_stays_in_unit_interval() {
        for k in 3..200 {
            for &lambda in &[1e-9, 1e-6, 1e-3, 0.1, 1.0] {
                let p = scan_pvalue(k, 50, 1_000_000, lambda);
                assert!((0.0..=1.0).contains(&p), "p={} out of range", p);
            }
        }
    }

    #[test]
    fn pvalue_never_increases_with_count() {
        let mut prev = f64::INFINITY;
        // beyond the Poisson mean the tail only thins out
        for k in 10..100 {
            let p = scan_pvalue(k, 50, 1_000_000, 0.1);
            assert!(p <= prev + 1e-15, "p-value rose at k={}", k);
            prev = p;
        }
    }

    #[test]
    fn vanishing_rate_with_observed_reads_is_extreme() {
        // lambda ~ 0 makes any occupied window a vanishing-probability
        // event: sigma ~ 0 from the pmf side, so p ~ sigma ~ 0
        let p = scan_pvalue(5, 50, 1_000_000, 0.0);
        assert_eq!(p, 0.0);
    }
}
