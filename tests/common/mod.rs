use contique_rs::continuation::ContinuationRun;
use contique_rs::newtonxt::StepResult;
use nalgebra::DVector;

/// Drain a run into its accepted steps, dropping a trailing terminal
/// failure if present (tests that want to see it ask for the raw iterator
/// instead).
pub fn collect_successful<'a, F>(run: ContinuationRun<'a, F>) -> Vec<StepResult>
where
    F: Fn(&DVector<f64>, f64) -> DVector<f64> + 'a,
{
    run.take_while(|step| step.success).collect()
}
