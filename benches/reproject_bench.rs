use std::io::Cursor;

use byteorder::{BigEndian, LittleEndian, WriteBytesExt};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use shapeproj::proj::profile::{LAMBERT_93, LAMBERT_II};
use shapeproj::{CancelToken, FeatureStream, RecordReader, Reprojector};

/// Grid of Lambert II coordinates around Paris.
fn make_coords(n: usize) -> Vec<(f64, f64)> {
    (0..n)
        .map(|i| {
            let t = i as f64 / n as f64;
            (560_000.0 + t * 80_000.0, 100_000.0 + t * 150_000.0)
        })
        .collect()
}

/// In-memory .shp with `records` polylines of `points` vertices each.
fn make_shapefile(records: usize, points: usize) -> Vec<u8> {
    let mut body = Vec::new();
    for r in 0..records {
        let mut rec = Vec::new();
        for v in [560_000.0, 100_000.0, 640_000.0, 250_000.0] {
            rec.write_f64::<LittleEndian>(v).unwrap();
        }
        rec.write_i32::<LittleEndian>(2).unwrap();
        rec.write_i32::<LittleEndian>(points as i32).unwrap();
        rec.write_i32::<LittleEndian>(0).unwrap();
        rec.write_i32::<LittleEndian>((points / 2) as i32).unwrap();
        for p in 0..points {
            rec.write_f64::<LittleEndian>(560_000.0 + (r * points + p) as f64).unwrap();
            rec.write_f64::<LittleEndian>(100_000.0 + p as f64 * 10.0).unwrap();
        }
        body.write_i32::<BigEndian>(r as i32 + 1).unwrap();
        body.write_i32::<BigEndian>(((rec.len() + 4) / 2) as i32).unwrap();
        body.write_i32::<LittleEndian>(3).unwrap();
        body.extend_from_slice(&rec);
    }

    let mut out = Vec::with_capacity(100 + body.len());
    out.write_i32::<BigEndian>(9994).unwrap();
    for _ in 0..5 {
        out.write_i32::<BigEndian>(0).unwrap();
    }
    out.write_i32::<BigEndian>(((100 + body.len()) / 2) as i32).unwrap();
    out.write_i32::<LittleEndian>(1000).unwrap();
    out.write_i32::<LittleEndian>(3).unwrap();
    for _ in 0..8 {
        out.write_f64::<LittleEndian>(0.0).unwrap();
    }
    out.extend_from_slice(&body);
    out
}

fn bench_convert_single(c: &mut Criterion) {
    for key in [LAMBERT_93, LAMBERT_II] {
        let r = Reprojector::for_key(key);
        let (x, y) = if key == LAMBERT_93 {
            (648_237.0, 6_862_107.0)
        } else {
            (600_000.0, 200_000.0)
        };
        c.bench_function(&format!("convert_{key}"), |b| {
            b.iter(|| black_box(r.convert(black_box(x), black_box(y)).unwrap()));
        });
    }
}

fn bench_convert_batch_thread_scaling(c: &mut Criterion) {
    let n = 100_000_usize;
    let input = make_coords(n);
    let r = Reprojector::for_key(LAMBERT_II);
    let token = CancelToken::new();

    for &threads in &[1, 2, 4, 8] {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .unwrap();

        c.bench_function(&format!("convert_batch_100k_threads_{threads}"), |b| {
            b.iter(|| {
                let mut coords = input.clone();
                pool.install(|| r.convert_batch(&mut coords, &token).unwrap());
                black_box(coords)
            });
        });
    }
}

fn bench_read_records(c: &mut Criterion) {
    let bytes = make_shapefile(1_000, 64);

    c.bench_function("read_1k_polylines", |b| {
        b.iter(|| {
            let mut stream = FeatureStream::new(Cursor::new(bytes.as_slice())).unwrap();
            black_box(stream.read_all().unwrap())
        });
    });

    c.bench_function("read_1k_polylines_reprojected", |b| {
        b.iter(|| {
            let reader = RecordReader::new().with_point_converter(Reprojector::for_key(LAMBERT_II));
            let mut stream = FeatureStream::new(Cursor::new(bytes.as_slice()))
                .unwrap()
                .with_reader(reader);
            black_box(stream.read_all().unwrap())
        });
    });
}

criterion_group!(
    benches,
    bench_convert_single,
    bench_convert_batch_thread_scaling,
    bench_read_records
);
criterion_main!(benches);
