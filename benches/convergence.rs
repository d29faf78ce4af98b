#![feature(test)]
extern crate test;
// Bench documentation
// https://doc.rust-lang.org/unstable-book/library-features/test.html

#[cfg(test)]
use test::Bencher;

use heatplate::grid::*;
use heatplate::initial_conditions::*;
use heatplate::par_slice;
use heatplate::plate::*;
use heatplate::solver::*;

fn plate(rows: usize, cols: usize, tolerance: f64) -> Plate {
    let mut g = Grid::allocate(rows, cols).unwrap();
    generate_ic(&mut g, ICType::Impulse { variance: 8.0 }, 0.0, 10000);
    let params = PlateParams {
        name: "bench.bin".to_owned(),
        time_step: 1,
        diffusivity: 1.0,
        spacing: 2.0,
        tolerance,
    };
    Plate::new(params, g, 10000).unwrap()
}

#[bench]
fn bench_serial_256(bencher: &mut Bencher) {
    bencher.iter(|| {
        let mut p = plate(256, 256, 1e-3);
        SerialSolver.solve(&mut p).unwrap();
        p.iterations
    });
}

#[bench]
fn bench_parallel_256(bencher: &mut Bencher) {
    let mut solver = ParallelSolver::new(8).unwrap();
    bencher.iter(|| {
        let mut p = plate(256, 256, 1e-3);
        solver.solve(&mut p).unwrap();
        p.iterations
    });
}

#[bench]
fn bench_parallel_1024(bencher: &mut Bencher) {
    let mut solver = ParallelSolver::new(8).unwrap();
    bencher.iter(|| {
        let mut p = plate(1024, 1024, 1e-2);
        solver.solve(&mut p).unwrap();
        p.iterations
    });
}

#[bench]
fn bench_copy(bencher: &mut Bencher) {
    let chunk_size = 50000;
    let n = 20000000;
    let a = vec![1.5; n];
    let mut b = vec![0.0; n];
    bencher.iter(|| {
        par_slice::copy(&a, &mut b, chunk_size);
    });
    println!("vo: {:?}", b[0]);
}
