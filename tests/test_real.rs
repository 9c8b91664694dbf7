// tests/test_real.rs: Real-coordinate containers.
//
// A Julia-set style escape-time function is defined over continuous space,
// combined with other real containers through the same promotion table as pixel
// grids, and sampled back onto a grid to be materialized.

use pixelwise::ops::{
    ArrayImg, Interval, NearestNeighbor, PixelContainer, PixelOps, RealInterval, RealPixelContainer,
    RealPixelOps, rasterize,
};
use pixelwise::core_modules::real::RealFunctionView;

fn escape_time(p: &[f64]) -> u8 {
    let (mut c, mut d) = (p[0], p[1]);
    let mut i = 0u8;
    while i < 64 && c * c + d * d < 4.0 {
        let e = c * c - d * d;
        d = 2.0 * c * d + 0.6;
        c = e + 0.2;
        i += 1;
    }
    i
}

#[test]
fn sampled_fractal_has_grid_shape() {
    let domain = RealInterval::new(vec![-1.0, -1.0], vec![1.0, 1.0]).unwrap();
    let julia = RealFunctionView::new(2, escape_time).bounded(domain.clone());
    assert_eq!(julia.real_interval(), Some(domain));

    let grid = Interval::from_dimensions(&[5, 5]).unwrap();
    let image = rasterize(&julia, grid)
        .scaled(vec![-1.0, -1.0], vec![0.5, 0.5])
        .unwrap()
        .materialize()
        .unwrap();
    assert_eq!(image.dimensions(), vec![5, 5]);
    assert_eq!(image.get(&[2, 2]), escape_time(&[0.0, 0.0]));
    assert_eq!(image.get(&[0, 4]), escape_time(&[-1.0, 1.0]));
}

#[test]
fn threshold_of_real_sum_is_exact() {
    let julia = RealFunctionView::new(2, escape_time);
    let bias = RealFunctionView::new(2, |_: &[f64]| -10i64);
    let shifted = (&julia).plus(&bias);
    let at_origin: i64 = shifted.get(&[0.0, 0.0]);
    assert_eq!(at_origin, escape_time(&[0.0, 0.0]) as i64 - 10);

    let mask = (&julia).ge(RealFunctionView::new(2, |_: &[f64]| 64u32));
    assert_eq!(mask.get(&[0.0, 0.0]), escape_time(&[0.0, 0.0]) >= 64);
}

#[test]
fn grid_round_trip_through_nearest_neighbor() {
    let img = ArrayImg::from_vec(&[2, 2], vec![1.0f32, 2.0, 3.0, 4.0]).unwrap();
    let continuous = NearestNeighbor::new(&img).as_f64();
    assert_eq!(continuous.get(&[0.9, 0.2]), 2.0);
    let back = continuous
        .rasterize(img.interval().unwrap())
        .materialize()
        .unwrap();
    assert_eq!(back.as_slice(), &[1.0, 2.0, 3.0, 4.0]);
}
