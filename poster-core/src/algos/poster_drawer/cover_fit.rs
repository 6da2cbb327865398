/// Where the captured map lands on the poster canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub draw_width: f64,
    pub draw_height: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Placement {
    pub fn scale_x(&self, captured_width: u32) -> f64 {
        self.draw_width / captured_width as f64
    }

    pub fn scale_y(&self, captured_height: u32) -> f64 {
        self.draw_height / captured_height as f64
    }
}

/// Scales a captured map uniformly so it covers the whole output canvas.
///
/// The axis on which the map is relatively larger overflows the canvas and is
/// cropped evenly on both sides; the other axis fits exactly.
pub fn cover_fit(captured: (u32, u32), output: (u32, u32)) -> Placement {
    let (captured_width, captured_height) = captured;
    let (out_width, out_height) = (output.0 as f64, output.1 as f64);

    let map_aspect = captured_width as f64 / captured_height as f64;
    let export_aspect = out_width / out_height;

    if map_aspect > export_aspect {
        let draw_width = out_height * map_aspect;
        Placement {
            draw_width,
            draw_height: out_height,
            offset_x: (out_width - draw_width) / 2.0,
            offset_y: 0.0,
        }
    } else {
        let draw_height = out_width / map_aspect;
        Placement {
            draw_width: out_width,
            draw_height,
            offset_x: 0.0,
            offset_y: (out_height - draw_height) / 2.0,
        }
    }
}
