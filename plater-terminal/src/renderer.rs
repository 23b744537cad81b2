/// ASCII rasterizer for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix4, Point3};
use plater_core::constants::{GROUND_LEVEL, TABLE_HALF_SIZE};
use plater_core::{Aabb, Mesh};
use std::io::Write;

use crate::camera::Camera;

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

const TABLE_CHAR: char = '~';
const BOX_CHAR: char = '$';

/// Lines win depth ties against the faces they lie on.
const LINE_DEPTH_BIAS: f32 = 1e-3;

/// ASCII renderer that converts 3D meshes to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
        }
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
    }

    /// Character at a cell, for inspection.
    #[cfg(test)]
    pub fn cell(&self, x: usize, y: usize) -> Option<char> {
        (x < self.width && y < self.height).then(|| self.char_buffer[y * self.width + x])
    }

    /// Render the mesh under its current transform
    pub fn render_mesh(&mut self, mesh: &Mesh, camera: &Camera) {
        let model = mesh.transform.model_matrix();
        let view_projection = camera.view_projection();
        let light_dir = camera.view_direction();

        // Inverse transpose keeps normals perpendicular under non-uniform scale
        let normal_matrix = match model.fixed_view::<3, 3>(0, 0).try_inverse() {
            Some(inverse) => inverse.transpose(),
            None => return,
        };

        for (i, triangle) in mesh.geometry.triangles().enumerate() {
            let local_normal = match mesh.geometry.facet_normal(i) {
                Some(normal) => normal,
                None => triangle.calculate_normal(),
            };
            let brightness = match (normal_matrix * local_normal).try_normalize(1e-12) {
                Some(n) => n.dot(&light_dir).abs(),
                None => continue,
            };
            if !brightness.is_finite() {
                continue;
            }
            let char_index = (brightness * (LUMINOSITY_RAMP.len() - 1) as f32) as usize;
            let character = LUMINOSITY_RAMP[char_index.min(LUMINOSITY_RAMP.len() - 1)];

            let world = [0, 1, 2].map(|v| model.transform_point(&triangle.point(v)));
            self.render_triangle(&world, &view_projection, camera, character);
        }
    }

    fn render_triangle(
        &mut self,
        world: &[Point3<f32>; 3],
        view_projection: &Matrix4<f32>,
        camera: &Camera,
        character: char,
    ) {
        // Project vertices to screen space
        let mut screen_coords = [(0.0, 0.0, 0.0); 3];
        for (coords, point) in screen_coords.iter_mut().zip(world) {
            match self.project(camera, view_projection, point) {
                Some(projected) => *coords = projected,
                None => return, // Triangle is clipped
            }
        }

        self.rasterize_triangle(&screen_coords, character);
    }

    /// Outline of the table footprint on the ground plane
    pub fn render_table(&mut self, camera: &Camera) {
        let h = TABLE_HALF_SIZE;
        let table = Aabb::new(
            Point3::new(-h, GROUND_LEVEL, -h),
            Point3::new(h, GROUND_LEVEL, h),
        );
        let corners = table.corners();
        for i in 0..4 {
            self.render_segment(camera, &corners[i], &corners[(i + 1) % 4], TABLE_CHAR);
        }
    }

    /// Wireframe of the displayed bounding box
    pub fn render_box(&mut self, aabb: &Aabb, camera: &Camera) {
        if aabb.is_empty() {
            return;
        }

        const EDGES: [(usize, usize); 12] = [
            (0, 1), (1, 2), (2, 3), (3, 0),
            (4, 5), (5, 6), (6, 7), (7, 4),
            (0, 4), (1, 5), (2, 6), (3, 7),
        ];
        let corners = aabb.corners();
        for (a, b) in EDGES {
            self.render_segment(camera, &corners[a], &corners[b], BOX_CHAR);
        }
    }

    /// Plot a world-space segment by sampling it; samples outside the view
    /// are dropped individually so partly visible edges still show.
    fn render_segment(
        &mut self,
        camera: &Camera,
        start: &Point3<f32>,
        end: &Point3<f32>,
        character: char,
    ) {
        let view_projection = camera.view_projection();
        let samples = (self.width + self.height).max(2) * 2;

        for i in 0..=samples {
            let t = i as f32 / samples as f32;
            let point = Point3::from(start.coords.lerp(&end.coords, t));
            if let Some((x, y, depth)) = self.project(camera, &view_projection, &point) {
                let (x, y) = (x.floor() as usize, y.floor() as usize);
                if x < self.width && y < self.height {
                    self.plot(x, y, depth - LINE_DEPTH_BIAS, character);
                }
            }
        }
    }

    fn project(
        &self,
        camera: &Camera,
        view_projection: &Matrix4<f32>,
        point: &Point3<f32>,
    ) -> Option<(f32, f32, f32)> {
        camera.project_to_screen(point, view_projection, self.width as u32, self.height as u32)
    }

    fn plot(&mut self, x: usize, y: usize, depth: f32, character: char) {
        let idx = y * self.width + x;
        if depth < self.depth_buffer[idx] {
            self.depth_buffer[idx] = depth;
            self.char_buffer[idx] = character;
        }
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32); 3], character: char) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i32;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i32;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i32;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                if let Some((w0, w1, w2)) =
                    barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), (px, py))
                {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                        self.plot(x as usize, y as usize, depth, character);
                    }
                }
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                let c = self.char_buffer[y * self.width + x];

                let color = match c {
                    TABLE_CHAR => Color::Blue,
                    BOX_CHAR => Color::Yellow,
                    ' ' | '.' | ':' => Color::DarkGrey,
                    '-' | '=' => Color::Grey,
                    '+' | '*' => Color::Green,
                    '#' | '%' | '@' => Color::DarkGreen,
                    _ => Color::White,
                };

                writer.queue(SetForegroundColor(color))?;
                writer.queue(Print(c))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
