use crate::scan::{lambda, stat};
use crate::transcript::Expression;
use std::collections::HashMap;

/// Read count and scan-statistic p-value for one window position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowStat {
    pub count: usize,
    pub p_value: f64,
}

/// Slide a fixed-size window across the transcript span and score every
/// position.
///
/// The midpoint window edges and the junction index are cursors that
/// only ever move forward, so the whole scan is linear in the number of
/// midpoints plus window positions. Scanning stops early once every
/// midpoint lies behind the window: the remaining windows cannot hold
/// reads. Windows with two reads or fewer are never significant and get
/// p = 1 without touching the Poisson machinery; everything else goes
/// through a `(count, lambda)` cache since neighbouring windows usually
/// repeat the same test.
#[allow(clippy::too_many_arguments)]
pub fn scan_transcript(
    span_start: u64,
    span_end: u64,
    window_size: u64,
    midpoints: &[f64],
    junctions: &[u64],
    expr: &Expression,
    total_reads: u64,
    txome_size: u64,
) -> Vec<WindowStat> {
    let mut stats = Vec::new();

    let last_start = match (span_end + 1).checked_sub(window_size) {
        Some(s) if s >= span_start => s,
        _ => return stats,
    };

    // index of the first midpoint inside the window
    let mut mid_left = 0;
    // index of the first midpoint past the window
    let mut mid_right = 0;
    // index of the first junction ahead of the window start
    let mut ji = 0;

    let mut pval_cache: HashMap<(usize, u64), f64> = HashMap::new();

    for window_start in span_start..=last_start {
        let window_end = window_start + window_size - 1;

        while mid_left < midpoints.len() && midpoints[mid_left] < window_start as f64 {
            mid_left += 1;
        }
        if mid_left >= midpoints.len() {
            break;
        }

        while mid_right < midpoints.len() && midpoints[mid_right] <= window_end as f64 {
            mid_right += 1;
        }

        let count = mid_right - mid_left;

        // <= because junction entries mark the 1st bp of the next segment
        while ji < junctions.len() && junctions[ji] <= window_start {
            ji += 1;
        }

        if count > 2 {
            let window_lambda =
                lambda::convolve(window_start, window_end, expr, total_reads, junctions, ji);
            let p_value = *pval_cache
                .entry((count, window_lambda.to_bits()))
                .or_insert_with(|| stat::scan_pvalue(count, window_size, txome_size, window_lambda));
            stats.push(WindowStat { count, p_value });
        } else {
            stats.push(WindowStat { count, p_value: 1.0 });
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_expression() -> Expression {
        Expression::new(0.5, 0.25)
    }

    #[test]
    fn sparse_windows_short_circuit_to_one() {
        let midpoints = vec![1010.0, 1200.0];
        let stats = scan_transcript(
            1000,
            1399,
            50,
            &midpoints,
            &[],
            &flat_expression(),
            1000,
            10_000,
        );
        assert!(!stats.is_empty());
        assert!(stats.iter().all(|w| w.count <= 2 && w.p_value == 1.0));
    }

    #[test]
    fn clustered_reads_score_significant() {
        let mut midpoints = vec![1500.0, 1502.0, 1504.0, 1506.0, 1508.0, 1510.0];
        midpoints.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let stats = scan_transcript(
            1000,
            1999,
            50,
            &midpoints,
            &[],
            &flat_expression(),
            1000,
            10_000,
        );

        // window starting exactly at the cluster holds all six reads
        let idx = (1500 - 1000) as usize;
        assert_eq!(stats[idx].count, 6);
        assert!(stats[idx].p_value < 1e-6);
        // a window ahead of every read holds none
        assert_eq!(stats[0].count, 0);
        assert_eq!(stats[0].p_value, 1.0);
    }

    #[test]
    fn scan_stops_once_reads_are_exhausted() {
        let midpoints = vec![1005.0];
        let stats = scan_transcript(
            1000,
            1999,
            50,
            &midpoints,
            &[],
            &flat_expression(),
            1000,
            10_000,
        );
        // left cursor passes the lone midpoint once the window starts at
        // 1006, so scanning ends there instead of covering all 951 starts
        assert_eq!(stats.len(), 6);
    }

    #[test]
    fn span_shorter_than_window_yields_no_stats() {
        let stats = scan_transcript(
            1000,
            1020,
            50,
            &[1005.0],
            &[],
            &flat_expression(),
            1000,
            10_000,
        );
        assert!(stats.is_empty());
    }

    #[test]
    fn rescan_is_deterministic() {
        let midpoints: Vec<f64> = (0..40).map(|i| 1000.0 + (i * 7 % 200) as f64).collect();
        let mut sorted = midpoints.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let junctions = vec![1100, 1150];
        let a = scan_transcript(1000, 1299, 50, &sorted, &junctions, &flat_expression(), 500, 5000);
        let b = scan_transcript(1000, 1299, 50, &sorted, &junctions, &flat_expression(), 500, 5000);
        assert_eq!(a, b);
    }
}
