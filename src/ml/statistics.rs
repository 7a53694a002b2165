/*!
 * # Descriptive statistics
 *
 * Small numeric helpers shared by the forecaster and the inventory policy
 * calculator.
 */

use crate::errors::ServiceError;

/// Arithmetic mean. Returns `None` for an empty input.
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0_f64, 0_usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Sample standard deviation (n - 1 denominator).
pub fn sample_std_dev<I>(values: I) -> Result<f64, ServiceError>
where
    I: IntoIterator<Item = f64>,
{
    let values: Vec<f64> = values.into_iter().collect();
    if values.len() < 2 {
        return Err(ServiceError::InsufficientData(format!(
            "sample standard deviation needs at least 2 observations, got {}",
            values.len()
        )));
    }

    let n = values.len() as f64;
    let center = mean(values.iter().copied()).unwrap_or_default();
    let sum_sq = values.iter().map(|v| (v - center).powi(2)).sum::<f64>();
    Ok((sum_sq / (n - 1.0)).sqrt())
}

// Acklam's rational approximation, relative error below 1.15e-9.
const A: [f64; 6] = [
    -3.969_683_028_665_376e1,
    2.209_460_984_245_205e2,
    -2.759_285_104_469_687e2,
    1.383_577_518_672_690e2,
    -3.066_479_806_614_716e1,
    2.506_628_277_459_239,
];
const B: [f64; 5] = [
    -5.447_609_879_822_406e1,
    1.615_858_368_580_409e2,
    -1.556_989_798_598_866e2,
    6.680_131_188_771_972e1,
    -1.328_068_155_288_572e1,
];
const C: [f64; 6] = [
    -7.784_894_002_430_293e-3,
    -3.223_964_580_411_365e-1,
    -2.400_758_277_161_838,
    -2.549_732_539_343_734,
    4.374_664_141_464_968,
    2.938_163_982_698_783,
];
const D: [f64; 4] = [
    7.784_695_709_041_462e-3,
    3.224_671_290_700_398e-1,
    2.445_134_137_142_996,
    3.754_408_661_907_416,
];
const P_LOW: f64 = 0.02425;
const P_HIGH: f64 = 1.0 - P_LOW;

/// Quantile function of the standard normal distribution.
///
/// `p` must lie in the open interval (0, 1); the endpoints map to infinite
/// quantiles and are rejected.
pub fn inverse_standard_normal_cdf(p: f64) -> Result<f64, ServiceError> {
    if !p.is_finite() || p <= 0.0 || p >= 1.0 {
        return Err(ServiceError::invalid_parameter(format!(
            "probability must lie strictly between 0 and 1 (got {})",
            p
        )));
    }

    let x = if p < P_LOW {
        let q = (-2.0 * p.ln()).sqrt();
        tail_quantile(q)
    } else if p <= P_HIGH {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    } else {
        let q = (-2.0 * (1.0 - p).ln()).sqrt();
        -tail_quantile(q)
    };

    Ok(x)
}

fn tail_quantile(q: f64) -> f64 {
    (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
        / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
}
