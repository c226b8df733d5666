use std::env;
use std::time::Duration;

use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;

use toy_core::constants::{SCREEN_HEIGHT, SCREEN_WIDTH};
use toy_core::Emulator;

const WINDOW_SCALE: u32 = 6;
const STEPS_PER_FRAME: u32 = 1000;

fn parse_cli_args() -> (String, String) {
    let args: Vec<String> = env::args().collect();
    match (args.get(1), args.get(2)) {
        (Some(otp), Some(flash)) => (otp.clone(), flash.clone()),
        _ => {
            eprintln!("toy-viewer expects two arguments: a path to an OTP image and a path to a flash image.");
            eprintln!("cargo run --bin toy-viewer otp.dat flash.dat");
            std::process::exit(1);
        }
    }
}

/// Expands a 4-bit channel to 8 bits by repeating the nibble, the same
/// trick the host boundary uses for every other nibble-packed format in
/// this pack.
fn expand_nibble(n: u8) -> u8 {
    n | (n << 4)
}

fn main() -> Result<(), String> {
    tracing_subscriber::fmt::init();

    let (otp_path, flash_path) = parse_cli_args();
    let otp = std::fs::read(&otp_path).unwrap_or_else(|e| {
        eprintln!("failed to read {}: {}", otp_path, e);
        std::process::exit(1);
    });
    let flash = std::fs::read(&flash_path).unwrap_or_else(|e| {
        eprintln!("failed to read {}: {}", flash_path, e);
        std::process::exit(1);
    });

    let mut emulator = Emulator::new();
    emulator.load_otp(&otp).unwrap_or_else(|e| {
        eprintln!("failed to load OTP image: {}", e);
        std::process::exit(1);
    });
    emulator.load_flash(&flash).unwrap_or_else(|e| {
        eprintln!("failed to load flash image: {}", e);
        std::process::exit(1);
    });

    let sdl_context = sdl2::init()?;
    let video_subsystem = sdl_context.video()?;

    let window = video_subsystem
        .window(
            "toy-viewer",
            SCREEN_WIDTH as u32 * WINDOW_SCALE,
            SCREEN_HEIGHT as u32 * WINDOW_SCALE,
        )
        .position_centered()
        .build()
        .map_err(|e| e.to_string())?;

    let mut canvas = window.into_canvas().present_vsync().build().map_err(|e| e.to_string())?;
    let texture_creator = canvas.texture_creator();
    let mut texture = texture_creator
        .create_texture_streaming(
            PixelFormatEnum::RGB24,
            SCREEN_WIDTH as u32,
            SCREEN_HEIGHT as u32,
        )
        .map_err(|e| e.to_string())?;

    let mut event_pump = sdl_context.event_pump()?;
    let mut texture_data = vec![0u8; SCREEN_WIDTH * SCREEN_HEIGHT * 3];

    'running: loop {
        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => break 'running,
                _ => {}
            }
        }

        emulator.run(STEPS_PER_FRAME);

        let video = emulator.video();
        for x in 0..SCREEN_WIDTH {
            for y in 0..SCREEN_HEIGHT {
                let pixel = video.pixels[x][y];
                let r = expand_nibble(((pixel >> 8) & 0x0f) as u8);
                let g = expand_nibble(((pixel >> 4) & 0x0f) as u8);
                let b = expand_nibble((pixel & 0x0f) as u8);
                let offset = (y * SCREEN_WIDTH + x) * 3;
                texture_data[offset] = r;
                texture_data[offset + 1] = g;
                texture_data[offset + 2] = b;
            }
        }
        texture
            .update(None, &texture_data, SCREEN_WIDTH * 3)
            .map_err(|e| e.to_string())?;

        canvas.copy(&texture, None, None)?;
        canvas.present();

        std::thread::sleep(Duration::from_millis(17));
    }

    Ok(())
}
