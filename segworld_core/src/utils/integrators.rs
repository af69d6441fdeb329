// segworld_core/src/utils/integrators.rs

use nalgebra::{DVector, Scalar};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// A fixed-step integrator for `x_dot = f(x, t)` over `[t0, tf]`.
pub trait Integrator<T>: Debug + Send + Sync {
    fn step(
        &self,
        func: &dyn Fn(&DVector<T>, T) -> DVector<T>,
        x0: &DVector<T>,
        t0: T,
        tf: T,
    ) -> DVector<T>;
}

// Runge-Kutta methods
#[derive(Debug, Default, Clone, Copy)]
pub struct RK1;

impl<T> Integrator<T> for RK1
where
    T: Scalar + num_traits::Float + std::ops::Mul<DVector<T>, Output = DVector<T>>,
    DVector<T>: std::ops::Add<Output = DVector<T>>,
{
    fn step(
        &self,
        func: &dyn Fn(&DVector<T>, T) -> DVector<T>,
        x0: &DVector<T>,
        t0: T,
        tf: T,
    ) -> DVector<T> {
        let dt = tf - t0;
        x0.clone() + dt * func(x0, t0) // Euler's method
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RK2;

impl<T> Integrator<T> for RK2
where
    T: Scalar + num_traits::Float + std::ops::Mul<DVector<T>, Output = DVector<T>>,
    DVector<T>: std::ops::Add<Output = DVector<T>>,
{
    fn step(
        &self,
        func: &dyn Fn(&DVector<T>, T) -> DVector<T>,
        x0: &DVector<T>,
        t0: T,
        tf: T,
    ) -> DVector<T> {
        let dt = tf - t0;
        let half = T::from(0.5).unwrap();
        let k1 = func(x0, t0);
        let k2 = func(&(x0.clone() + dt * k1.clone()), tf);

        // Heun: average of the slopes at both ends
        x0.clone() + half * dt * (k1 + k2)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RK3;

impl<T> Integrator<T> for RK3
where
    T: Scalar + num_traits::Float + std::ops::Mul<DVector<T>, Output = DVector<T>>,
    DVector<T>: std::ops::Add<Output = DVector<T>>,
{
    fn step(
        &self,
        func: &dyn Fn(&DVector<T>, T) -> DVector<T>,
        x0: &DVector<T>,
        t0: T,
        tf: T,
    ) -> DVector<T> {
        let dt = tf - t0;
        let two = T::from(2.0).unwrap();
        let four = T::from(4.0).unwrap();
        let six = T::from(6.0).unwrap();

        let k1 = func(x0, t0);
        let k2 = func(&(x0.clone() + dt * k1.clone()), tf);
        let k3 = func(
            &(x0.clone() + (dt / four) * (k1.clone() + k2.clone())),
            t0 + dt / two,
        );

        x0.clone() + (dt / six) * (k1 + k2 + four * k3)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RK4;

impl<T> Integrator<T> for RK4
where
    T: Scalar + num_traits::Float + std::ops::Mul<DVector<T>, Output = DVector<T>>,
    DVector<T>: std::ops::Add<Output = DVector<T>>,
{
    fn step(
        &self,
        func: &dyn Fn(&DVector<T>, T) -> DVector<T>,
        x0: &DVector<T>,
        t0: T,
        tf: T,
    ) -> DVector<T> {
        let dt = tf - t0;
        let half = T::from(0.5).unwrap();
        let sixth = T::from(1.0 / 6.0).unwrap();
        let two = T::from(2.0).unwrap();

        let k1 = func(x0, t0);
        let k2 = func(&(x0.clone() + half * dt * k1.clone()), t0 + half * dt);
        let k3 = func(&(x0.clone() + half * dt * k2.clone()), t0 + half * dt);
        let k4 = func(&(x0.clone() + dt * k3.clone()), tf);

        x0.clone() + dt * sixth * (k1 + two * k2 + two * k3 + k4)
    }
}

/// Config-facing selector for the plant's integration scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegratorKind {
    Rk1,
    Rk2,
    Rk3,
    #[default]
    Rk4,
}

impl IntegratorKind {
    pub fn build(self) -> Box<dyn Integrator<f64>> {
        match self {
            IntegratorKind::Rk1 => Box::new(RK1),
            IntegratorKind::Rk2 => Box::new(RK2),
            IntegratorKind::Rk3 => Box::new(RK3),
            IntegratorKind::Rk4 => Box::new(RK4),
        }
    }
}
