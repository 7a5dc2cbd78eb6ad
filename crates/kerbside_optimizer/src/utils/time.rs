/// Runs `$block` and logs how long the named optimizer stage took.
#[macro_export]
macro_rules! timed_stage {
    ($stage:literal, $block:expr) => {{
        let started = jiff::Timestamp::now();
        let result = $block;
        let elapsed = jiff::Timestamp::now().duration_since(started);

        tracing::debug!(stage = $stage, "Stage finished in {:?}", elapsed);

        result
    }};
}
