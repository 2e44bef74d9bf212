use bio_types::strand::Strand;
use clap::Parser;
use clipcall::io::{export::write_peaks_json, gff::write_peaks_gff};
use clipcall::{
    call_peaks, AlignedRead, CigarOp, Expression, ExpressionTable, InMemoryReads, PeakCallConfig,
    Transcript,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::ThreadPoolBuilder;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

/// Generate a synthetic CLIP-Seq read set over a spliced transcript,
/// run the peak caller on it, and write the resulting peaks.
#[derive(Parser, Debug)]
#[command(name = "simulate_clip", version, about = "Synthetic CLIP-Seq peak calling demo", long_about = None)]
struct Args {
    /// Length of the simulated transcript span in bases
    #[arg(long, default_value_t = 5000)]
    transcript_length: u64,

    /// Number of background reads scattered across the exons
    #[arg(long, default_value_t = 400)]
    background_reads: usize,

    /// Number of planted binding-site clusters
    #[arg(long, default_value_t = 2)]
    clusters: usize,

    /// Reads planted per cluster
    #[arg(long, default_value_t = 30)]
    cluster_reads: usize,

    /// Simulated read length
    #[arg(long, default_value_t = 36)]
    read_length: u32,

    /// Window size for the scan statistic
    #[arg(short, long, default_value_t = 50)]
    window_size: u64,

    /// P-value required of window scan statistic tests
    #[arg(short, long, default_value_t = 0.001)]
    p_val: f64,

    /// Output GFF path
    #[arg(short, long, default_value = "peaks.gff")]
    output: String,

    /// Optional JSON output path
    #[arg(long)]
    json: Option<String>,

    /// Number of threads to use
    #[arg(long, default_value_t = num_cpus::get())]
    threads: usize,

    /// RNG seed, for reproducible read sets
    #[arg(long, default_value_t = 7)]
    seed: u64,
}

fn synthetic_read(pos: u64, read_length: u32, id: usize) -> AlignedRead {
    AlignedRead {
        name: format!("sim_{}", id),
        pos,
        seq_len: read_length,
        cigar: vec![(CigarOp::Match, read_length)],
        is_reverse: false,
        mapq: 30,
    }
}

fn main() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(tracing::Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Setting tracing default failed");

    let args = Args::parse();

    ThreadPoolBuilder::new()
        .num_threads(args.threads)
        .build_global()
        .expect("Failed to build thread pool");

    let mut rng = StdRng::seed_from_u64(args.seed);
    let l = args.transcript_length;

    // three exons with two introns between them
    let mut tx = Transcript::new("sim_tx_1", "sim_gene_1", "chrS", Strand::Forward);
    tx.add_exon(1, 3 * l / 10);
    tx.add_exon(45 * l / 100, 7 * l / 10);
    tx.add_exon(85 * l / 100, l);
    let exons: Vec<(u64, u64)> = tx.exons().iter().map(|e| (e.start, e.end)).collect();

    info!(
        "simulating {} background reads and {} clusters of {} reads over a {}-bp transcript",
        args.background_reads, args.clusters, args.cluster_reads, l
    );

    let mut source = InMemoryReads::new();
    let mut read_id = 0;

    // uniform exonic background
    for _ in 0..args.background_reads {
        let (start, end) = exons[rng.gen_range(0..exons.len())];
        if end - start <= args.read_length as u64 {
            continue;
        }
        let pos = rng.gen_range(start..=end - args.read_length as u64);
        source.add("chrS", synthetic_read(pos, args.read_length, read_id));
        read_id += 1;
    }

    // planted binding sites, one per cluster, jittered by a few bases
    let mut sites = Vec::new();
    for _ in 0..args.clusters {
        let (start, end) = exons[rng.gen_range(0..exons.len())];
        let site = rng.gen_range(start..=end.saturating_sub(args.read_length as u64 + 5).max(start));
        sites.push(site);
        for _ in 0..args.cluster_reads {
            let pos = site + rng.gen_range(0..5);
            source.add("chrS", synthetic_read(pos, args.read_length, read_id));
            read_id += 1;
        }
    }
    info!("planted cluster sites at {:?}", sites);

    let total_reads = read_id as u64;

    // back out an exonic FPKM from the simulated depth
    let exonic_kb: f64 = exons.iter().map(|&(s, e)| (e - s + 1) as f64 / 1000.0).sum();
    let fpkm_exon = args.background_reads as f64 / exonic_kb / (total_reads as f64 / 1_000_000.0);
    let mut expression = ExpressionTable::new();
    expression.insert("sim_tx_1".to_string(), Expression::new(fpkm_exon, 0.1 * fpkm_exon));

    let config = PeakCallConfig {
        window_size: args.window_size,
        sig_p: args.p_val,
        ..PeakCallConfig::default()
    };

    let records = call_peaks(&[tx], &expression, &source, total_reads, &config);

    for r in &records {
        info!(
            "PEAK{}: {}:{}-{} ({} reads, p = {:.2e})",
            r.id, r.chrom, r.start, r.end, r.count, r.p_value
        );
    }

    write_peaks_gff(&records, &args.output).expect("Failed to write peaks GFF");
    if let Some(json_path) = &args.json {
        write_peaks_json(&records, json_path).expect("Failed to write peaks JSON");
    }

    info!("wrote {} peaks to {}", records.len(), args.output);
}
