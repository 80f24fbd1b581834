use std::cell::Cell;
use std::rc::Rc;

use anyhow::Result;
use frameshell::coords::Vec2;
use frameshell::input::{Key, KeyboardEvent, KeyboardEventKind, MouseEvent};
use frameshell::logging::{LoggingConfig, init_logging};
use frameshell::{Shell, ShellConfig};

/// Last pointer state reported to the mouse callback.
#[derive(Debug, Copy, Clone, Default)]
struct Pointer {
    client: Vec2,
    held: bool,
    seen: bool,
}

/// Clear color chosen from the pointer: x → red, y → green, held primary
/// button → blue.
#[derive(Debug, Copy, Clone, PartialEq)]
struct Tint {
    r: f64,
    g: f64,
    b: f64,
}

impl Tint {
    const IDLE: Tint = Tint { r: 0.08, g: 0.09, b: 0.12 };

    /// `width`/`height` are the client area in logical pixels at draw time.
    fn at(pointer: Pointer, width: f32, height: f32) -> Tint {
        if !pointer.seen {
            return Tint::IDLE;
        }
        let fx = (pointer.client.x / width.max(1.0)).clamp(0.0, 1.0);
        let fy = (pointer.client.y / height.max(1.0)).clamp(0.0, 1.0);
        Tint {
            r: f64::from(fx),
            g: f64::from(fy),
            b: if pointer.held { 0.8 } else { 0.2 },
        }
    }

    fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color { r: self.r, g: self.g, b: self.b, a: 1.0 }
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = ShellConfig::new(800, 600).with_title("frameshell demo");
    let mut shell = Shell::with_config(config)?;

    let pointer = Rc::new(Cell::new(Pointer::default()));

    // Sampled once; a DPI change while running skews the mapping slightly.
    let scale = shell.window().scale_factor() as f32;

    let p = pointer.clone();
    shell.set_mouse_event_function(move |ev: &MouseEvent| {
        p.set(Pointer {
            client: ev.client_position,
            held: ev.is_held(0),
            seen: true,
        });
    });

    let p = pointer.clone();
    let handle = shell.handle();
    shell.set_keyboard_event_function(move |ev: &KeyboardEvent| {
        if ev.detail != KeyboardEventKind::KeyDown {
            return;
        }
        log::info!("key {:?} code={:#04x} text={:?}", ev.key_id(), ev.code, ev.key);

        match ev.key_id() {
            Some(Key::Escape) => handle.exit(),
            Some(Key::Space) => p.set(Pointer::default()),
            _ => {}
        }
    });

    let device = shell.device().clone();
    let queue = shell.queue().clone();
    shell.set_draw_function(move |drawable, view| {
        // The drawable always matches the current window size.
        let width = drawable.texture.width() as f32 / scale;
        let height = drawable.texture.height() as f32 / scale;
        let clear = Tint::at(pointer.get(), width, height).to_wgpu();

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("frameshell demo encoder"),
        });

        {
            let _rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("frameshell demo clear pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
        }

        queue.submit(Some(encoder.finish()));
        drawable.present();
    });

    shell.run()?;
    Ok(())
}
