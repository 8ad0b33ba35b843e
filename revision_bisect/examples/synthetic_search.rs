use revision_bisect::{locate_introduction, BisectionOutcome};

fn main() {
    // Synthetic 32-revision history with the failure introduced at the index
    // given on the command line (default 20).
    let boundary: usize = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(20);
    let len = 32;

    let outcome = locate_introduction(len, |idx| {
        let failing = idx >= boundary;
        println!("probe r{idx}: {}", if failing { "failing" } else { "clean" });
        Ok::<_, std::convert::Infallible>(failing)
    })
    .expect("synthetic probe cannot fail");

    match outcome {
        BisectionOutcome::FoundAt(idx) => println!("failure introduced at r{idx}"),
        BisectionOutcome::PresentAcrossRange => println!("failure present across the full range"),
        BisectionOutcome::NeverReproduced => println!("failure never reproduced"),
    }
}
