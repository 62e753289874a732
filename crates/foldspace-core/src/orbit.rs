//! Orbit traps
//!
//! Orbit steps have no effect on distance or nearest-point queries. In the
//! generated color function they maintain a running `vec3 orbit` statistic of
//! the folded point, which orbit-colored primitives use as their RGB.

use glam::Vec3;

use crate::param::{Registry, Vector};
use crate::Result;

/// How an accumulator folds the current point into the trap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrbitStat {
    Min,
    MinAbs,
    Max,
    MaxAbs,
    Sum,
    SumAbs,
}

/// An orbit trap step
#[derive(Debug, Clone, PartialEq)]
pub enum Orbit {
    /// Declare `orbit` as `vec3(0.0)`
    InitZero,
    /// Declare `orbit` as `vec3(1e20)`
    InitInf,
    /// Declare `orbit` as `vec3(-1e20)`
    InitNegInf,
    /// Accumulate `(p.xyz - origin) * scale`
    Accumulate {
        stat: OrbitStat,
        scale: Vector,
        origin: Vector,
    },
}

impl Orbit {
    pub fn init_zero() -> Self {
        Orbit::InitZero
    }

    pub fn init_inf() -> Self {
        Orbit::InitInf
    }

    pub fn init_neg_inf() -> Self {
        Orbit::InitNegInf
    }

    pub fn accumulate(stat: OrbitStat, scale: impl Into<Vector>, origin: impl Into<Vector>) -> Self {
        Orbit::Accumulate {
            stat,
            scale: scale.into(),
            origin: origin.into(),
        }
    }

    pub fn min(scale: impl Into<Vector>) -> Self {
        Self::accumulate(OrbitStat::Min, scale, 0.0)
    }

    pub fn min_abs(scale: impl Into<Vector>) -> Self {
        Self::accumulate(OrbitStat::MinAbs, scale, 0.0)
    }

    pub fn max(scale: impl Into<Vector>) -> Self {
        Self::accumulate(OrbitStat::Max, scale, 0.0)
    }

    pub fn max_abs(scale: impl Into<Vector>) -> Self {
        Self::accumulate(OrbitStat::MaxAbs, scale, 0.0)
    }

    pub fn sum(scale: impl Into<Vector>) -> Self {
        Self::accumulate(OrbitStat::Sum, scale, 0.0)
    }

    pub fn sum_abs(scale: impl Into<Vector>) -> Self {
        Self::accumulate(OrbitStat::SumAbs, scale, 0.0)
    }

    /// Move the trap center away from the origin
    pub fn about(self, center: impl Into<Vector>) -> Self {
        match self {
            Orbit::Accumulate { stat, scale, .. } => Orbit::Accumulate {
                stat,
                scale,
                origin: center.into(),
            },
            init => init,
        }
    }

    pub fn is_init(&self) -> bool {
        !matches!(self, Orbit::Accumulate { .. })
    }

    pub fn declare(&self, registry: &mut Registry) -> Result<()> {
        match self {
            Orbit::Accumulate { scale, origin, .. } => {
                scale.declare(registry)?;
                origin.declare(registry)
            }
            _ => Ok(()),
        }
    }

    pub fn emit(&self) -> String {
        match self {
            Orbit::InitZero => "\tvec3 orbit = vec3(0.0);\n".to_string(),
            Orbit::InitInf => "\tvec3 orbit = vec3(1e20);\n".to_string(),
            Orbit::InitNegInf => "\tvec3 orbit = vec3(-1e20);\n".to_string(),
            Orbit::Accumulate {
                stat,
                scale,
                origin,
            } => {
                let term = if origin.is_literal(Vec3::ZERO) {
                    format!("p.xyz*{}", scale.glsl())
                } else {
                    format!("(p.xyz - {})*{}", origin.glsl(), scale.glsl())
                };
                match stat {
                    OrbitStat::Min => format!("\torbit = min(orbit, {});\n", term),
                    OrbitStat::MinAbs => format!("\torbit = min(orbit, abs({}));\n", term),
                    OrbitStat::Max => format!("\torbit = max(orbit, {});\n", term),
                    OrbitStat::MaxAbs => format!("\torbit = max(orbit, abs({}));\n", term),
                    OrbitStat::Sum => format!("\torbit += {};\n", term),
                    OrbitStat::SumAbs => format!("\torbit += abs({});\n", term),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_variants() {
        assert_eq!(Orbit::init_zero().emit(), "\tvec3 orbit = vec3(0.0);\n");
        assert_eq!(Orbit::init_inf().emit(), "\tvec3 orbit = vec3(1e20);\n");
        assert_eq!(Orbit::init_neg_inf().emit(), "\tvec3 orbit = vec3(-1e20);\n");
        assert!(Orbit::init_zero().is_init());
        assert!(!Orbit::sum(1.0).is_init());
    }

    #[test]
    fn accumulators_skip_zero_origin() {
        assert_eq!(
            Orbit::min(1.0).emit(),
            "\torbit = min(orbit, p.xyz*vec3(1.0, 1.0, 1.0));\n"
        );
        assert_eq!(
            Orbit::max_abs([0.42, 0.38, 0.19]).about([1.0, 0.0, 0.0]).emit(),
            "\torbit = max(orbit, abs((p.xyz - vec3(1.0, 0.0, 0.0))*vec3(0.42, 0.38, 0.19)));\n"
        );
        assert_eq!(Orbit::sum_abs("k").emit(), "\torbit += abs(p.xyz*_k);\n");
    }
}
