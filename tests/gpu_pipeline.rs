//! End-to-end ticks on a headless device.
//!
//! Every test returns early when no adapter is available so the suite still
//! passes on machines without a GPU.

use rand::{rngs::StdRng, SeedableRng};
use toroidal::config::{ConfigError, GridDimensions, LifeConfig};
use toroidal::gfx::{
    cell_renderer::CLEAR_COLOR, offscreen::CELL_PIXELS, GpuContext, OffscreenBackend,
};
use toroidal::simulation::{
    rules::{self, ALIVE, DEAD},
    seed, FrameLoop, GridError, Seed, SetupError, Slot, TickOutcome,
};

fn headless_context() -> Option<GpuContext> {
    match pollster::block_on(GpuContext::headless()) {
        Ok(context) => Some(context),
        Err(err) => {
            eprintln!("skipping GPU test: {}", err);
            None
        }
    }
}

fn grid_with(dims: GridDimensions, live: &[(u32, u32)]) -> Vec<u32> {
    let mut cells = vec![DEAD; dims.cell_count()];
    for &(x, y) in live {
        cells[dims.index(x, y)] = ALIVE;
    }
    cells
}

fn offscreen_loop(
    context: GpuContext,
    config: &LifeConfig,
    initial: [Vec<u32>; 2],
) -> FrameLoop<OffscreenBackend> {
    let backend = OffscreenBackend::with_generations(context, config, &initial).unwrap();
    FrameLoop::new(backend)
}

fn current(frame_loop: &FrameLoop<OffscreenBackend>) -> Vec<u32> {
    let slot = frame_loop.driver().current_slot();
    frame_loop.backend().read_generation(slot).unwrap()
}

#[test]
fn test_block_is_still() {
    let Some(context) = headless_context() else {
        return;
    };
    let config = LifeConfig::default().with_dimensions(8, 8);
    let dims = config.dimensions;
    let block = grid_with(dims, &[(3, 3), (4, 3), (3, 4), (4, 4)]);

    let mut frame_loop = offscreen_loop(context, &config, [block.clone(), seed::alternating(dims)]);
    for generation in 1..=4 {
        let outcome = frame_loop.tick().unwrap();
        assert_eq!(
            outcome,
            TickOutcome::Advanced {
                generation,
                current: Slot::from_step(generation)
            }
        );
        assert_eq!(current(&frame_loop), block);
    }
    assert_eq!(frame_loop.backend().submissions(), 4);
}

#[test]
fn test_blinker_oscillates_across_the_seam() {
    let Some(context) = headless_context() else {
        return;
    };
    let config = LifeConfig::default().with_dimensions(8, 8);
    let dims = config.dimensions;
    let vertical = grid_with(dims, &[(0, 7), (0, 0), (0, 1)]);
    let horizontal = grid_with(dims, &[(7, 0), (0, 0), (1, 0)]);

    let mut frame_loop = offscreen_loop(context, &config, [vertical.clone(), vec![DEAD; 64]]);
    frame_loop.tick().unwrap();
    assert_eq!(current(&frame_loop), horizontal);
    frame_loop.tick().unwrap();
    assert_eq!(current(&frame_loop), vertical);
}

#[test]
fn test_every_cell_of_the_write_buffer_is_replaced() {
    let Some(context) = headless_context() else {
        return;
    };
    // 20x12 with 8x8 tiles leaves partial tiles on both axes.
    let config = LifeConfig::default().with_dimensions(20, 12);
    let dims = config.dimensions;

    let mut frame_loop = offscreen_loop(
        context,
        &config,
        [vec![DEAD; dims.cell_count()], vec![ALIVE; dims.cell_count()]],
    );
    frame_loop.tick().unwrap();

    assert_eq!(frame_loop.driver().current_slot(), Slot::B);
    assert_eq!(rules::population(&current(&frame_loop)), 0);
}

#[test]
fn test_matches_host_rules() {
    let Some(context) = headless_context() else {
        return;
    };
    let config = LifeConfig::default()
        .with_dimensions(20, 12)
        .with_tile_size(4);
    let dims = config.dimensions;
    let mut rng = StdRng::seed_from_u64(7);
    let first = Seed::Scattered { density: 0.35 }.generate(dims, &mut rng);

    let mut frame_loop = offscreen_loop(context, &config, [first.clone(), seed::alternating(dims)]);
    let mut expected = first;
    for _ in 0..10 {
        frame_loop.tick().unwrap();
        expected = rules::step(&expected, dims);
        assert_eq!(current(&frame_loop), expected);
    }
}

#[test]
fn test_seeded_runs_are_identical() {
    let Some(first_context) = headless_context() else {
        return;
    };
    let Some(second_context) = headless_context() else {
        return;
    };
    let config = LifeConfig::default()
        .with_dimensions(32, 32)
        .with_seed(1234);

    let mut runs = [first_context, second_context].map(|context| {
        FrameLoop::new(OffscreenBackend::from_config(context, &config).unwrap())
    });
    for frame_loop in runs.iter_mut() {
        for _ in 0..5 {
            frame_loop.tick().unwrap();
        }
    }

    assert_eq!(current(&runs[0]), current(&runs[1]));
}

#[test]
fn test_upload_rejects_wrong_length() {
    let Some(context) = headless_context() else {
        return;
    };
    let config = LifeConfig::default().with_dimensions(8, 8);
    let backend = OffscreenBackend::from_config(context, &config).unwrap();

    let result = backend
        .pipeline()
        .upload_generation(backend.context().queue(), Slot::A, &[ALIVE; 3]);
    assert_eq!(
        result,
        Err(GridError::LengthMismatch {
            slot: Slot::A,
            expected: 64,
            actual: 3
        })
    );
}

#[test]
fn test_uploaded_generation_is_stepped() {
    let Some(context) = headless_context() else {
        return;
    };
    let config = LifeConfig::default()
        .with_dimensions(8, 8)
        .with_pattern(Seed::Empty);
    let dims = config.dimensions;
    let mut frame_loop = FrameLoop::new(OffscreenBackend::from_config(context, &config).unwrap());

    let glider = Seed::Glider.generate(dims, &mut StdRng::seed_from_u64(0));
    let backend = frame_loop.backend();
    backend
        .pipeline()
        .upload_generation(backend.context().queue(), Slot::A, &glider)
        .unwrap();

    frame_loop.tick().unwrap();
    assert_eq!(current(&frame_loop), rules::step(&glider, dims));
}

fn assert_rgba_near(actual: [u8; 4], expected: [f64; 4]) {
    for (channel, (&got, want)) in actual.iter().zip(expected).enumerate() {
        let want = (want * 255.0).round() as i32;
        assert!(
            (got as i32 - want).abs() <= 1,
            "channel {} is {}, expected about {} in {:?}",
            channel,
            got,
            want,
            actual
        );
    }
}

#[test]
fn test_rendered_frame_shows_live_cells_only() {
    let Some(context) = headless_context() else {
        return;
    };
    let config = LifeConfig::default().with_dimensions(6, 6);
    let dims = config.dimensions;
    let block = grid_with(dims, &[(1, 1), (2, 1), (1, 2), (2, 2)]);

    let mut frame_loop = offscreen_loop(context, &config, [block, seed::alternating(dims)]);
    frame_loop.tick().unwrap();

    let backend = frame_loop.backend();
    let (width, height) = backend.size();
    assert_eq!((width, height), (6 * CELL_PIXELS, 6 * CELL_PIXELS));
    let pixels = backend.read_pixels().unwrap();
    assert_eq!(pixels.len(), (width * height) as usize);

    // Grid row 0 is at the bottom of the frame.
    let pixel = |px: u32, py_from_bottom: u32| {
        pixels[((height - 1 - py_from_bottom) * width + px) as usize]
    };
    let cell_center = |x: u32, y: u32| {
        let half = CELL_PIXELS / 2;
        pixel(x * CELL_PIXELS + half, y * CELL_PIXELS + half)
    };
    let clear = [CLEAR_COLOR.r, CLEAR_COLOR.g, CLEAR_COLOR.b, CLEAR_COLOR.a];

    for (x, y) in [(1, 1), (2, 1), (1, 2), (2, 2)] {
        let u = x as f64 / 6.0;
        let v = y as f64 / 6.0;
        assert_rgba_near(cell_center(x, y), [u, v, 1.0 - u, 1.0]);
    }
    for (x, y) in [(0, 0), (4, 4), (3, 1), (5, 2)] {
        assert_rgba_near(cell_center(x, y), clear);
    }
    // Live squares stop short of their cell borders.
    assert_rgba_near(pixel(CELL_PIXELS, CELL_PIXELS), clear);
}

#[test]
fn test_setup_rejects_invalid_config() {
    let Some(context) = headless_context() else {
        return;
    };
    let config = LifeConfig::default().with_dimensions(600_000, 1);
    let initial = [vec![DEAD; 600_000], vec![DEAD; 600_000]];

    let result = OffscreenBackend::with_generations(context, &config, &initial);
    assert!(matches!(
        result,
        Err(SetupError::Config(ConfigError::TooManyTiles { tiles_x: 75_000, .. }))
    ));
}
