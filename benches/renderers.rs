use criterion::{criterion_group, criterion_main, Criterion};
use sketch_maze::{
    renderers::RasterWalls,
    units::CellPixels,
    Maze,
};

fn bench_rasterize_200(c: &mut Criterion) {
    let maze = Maze::new(200, 200);
    let raster = RasterWalls::new(CellPixels(8));
    c.bench_function("rasterize_200", move |b| {
        b.iter(|| maze.rasterize(&raster))
    });
}

fn bench_text_render_200(c: &mut Criterion) {
    let maze = Maze::new(200, 200);
    c.bench_function("text_render_200", move |b| {
        b.iter(|| format!("{}", maze.grid()))
    });
}

criterion_group!(benches, bench_rasterize_200, bench_text_render_200);
criterion_main!(benches);
