use sfml::graphics::{
    Color, FloatRect, PrimitiveType, RenderStates, RenderTarget, RenderWindow, Vertex, View,
};
use sfml::system::{Vector2f, Vector2u};

/// Minimal 2D drawing context the stage renders into.
///
/// Coordinates passed to the path methods are logical (stage) units; the
/// uniform scale set through [`Surface::scale`] maps them onto device pixels.
pub trait Surface {
    /// Sets the backing size in device pixels and drops any scale transform.
    fn resize(&mut self, width: u32, height: u32);
    fn scale(&mut self, factor: f32);
    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32);
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f32, y: f32);
    fn line_to(&mut self, x: f32, y: f32);
    fn close_path(&mut self);
    fn stroke(&mut self);
}

/// Device-pixel size of the backing window, as last requested.
///
/// Kept separately because `RenderWindow::set_size` may apply
/// asynchronously, so the window can still report the old size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    size: Vector2u,
}

impl Viewport {
    pub fn new(size: Vector2u) -> Viewport {
        Viewport { size }
    }

    pub fn size(&self) -> Vector2u {
        self.size
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.size = Vector2u::new(width, height);
    }

    /// View rectangle for a uniform `factor` scale.
    pub fn scaled(&self, factor: f32) -> FloatRect {
        FloatRect::new(
            0.0,
            0.0,
            self.size.x as f32 / factor,
            self.size.y as f32 / factor,
        )
    }
}

/// Stroke paths collected as vertex lists, one per subpath.
pub struct PathBuilder {
    pub color: Color,
    subpaths: Vec<Vec<Vertex>>,
}

impl PathBuilder {
    pub fn new(color: Color) -> PathBuilder {
        PathBuilder {
            color,
            subpaths: Vec::new(),
        }
    }

    fn vertex(&self, x: f32, y: f32) -> Vertex {
        Vertex::new(Vector2f::new(x, y), self.color, Vector2f::new(0.0, 0.0))
    }

    pub fn clear(&mut self) {
        self.subpaths.clear();
    }

    pub fn move_to(&mut self, x: f32, y: f32) {
        let vertex = self.vertex(x, y);
        self.subpaths.push(vec![vertex]);
    }

    pub fn line_to(&mut self, x: f32, y: f32) {
        let vertex = self.vertex(x, y);
        match self.subpaths.last_mut() {
            Some(subpath) => subpath.push(vertex),
            // A lone line_to behaves like move_to
            None => self.subpaths.push(vec![vertex]),
        }
    }

    /// Returns the current subpath to its first vertex.
    pub fn close(&mut self) {
        if let Some(subpath) = self.subpaths.last_mut() {
            if let Some(first) = subpath.first().cloned() {
                subpath.push(first);
            }
        }
    }

    /// Subpaths with at least one segment, ready for `LINE_STRIP`.
    pub fn strips(&self) -> impl Iterator<Item = &[Vertex]> + '_ {
        self.subpaths
            .iter()
            .filter(|subpath| subpath.len() > 1)
            .map(Vec::as_slice)
    }
}

/// [`Surface`] backed by an SFML window.
///
/// Paths go through a [`PathBuilder`] and are emitted as `LINE_STRIP`
/// primitives on [`Surface::stroke`].
pub struct WindowSurface {
    window: RenderWindow,
    viewport: Viewport,
    pub background: Color,
    path: PathBuilder,
}

impl WindowSurface {
    pub fn new(window: RenderWindow, background: Color, stroke_color: Color) -> WindowSurface {
        let viewport = Viewport::new(window.size());
        WindowSurface {
            window,
            viewport,
            background,
            path: PathBuilder::new(stroke_color),
        }
    }

    pub fn window(&self) -> &RenderWindow {
        &self.window
    }

    pub fn window_mut(&mut self) -> &mut RenderWindow {
        &mut self.window
    }
}

impl Surface for WindowSurface {
    fn resize(&mut self, width: u32, height: u32) {
        self.viewport.resize(width, height);
        if self.window.size() != self.viewport.size() {
            self.window.set_size((width, height));
        }
        self.window.set_view(&View::from_rect(self.viewport.scaled(1.0)));
    }

    fn scale(&mut self, factor: f32) {
        self.window
            .set_view(&View::from_rect(self.viewport.scaled(factor)));
    }

    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let corner = |cx: f32, cy: f32| {
            Vertex::new(
                Vector2f::new(cx, cy),
                self.background,
                Vector2f::new(0.0, 0.0),
            )
        };
        let quad = [
            corner(x, y),
            corner(x + width, y),
            corner(x, y + height),
            corner(x + width, y + height),
        ];
        self.window
            .draw_primitives(&quad, PrimitiveType::TRIANGLE_STRIP, &RenderStates::DEFAULT);
    }

    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.path.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.path.line_to(x, y);
    }

    fn close_path(&mut self) {
        self.path.close();
    }

    fn stroke(&mut self) {
        for strip in self.path.strips() {
            self.window
                .draw_primitives(strip, PrimitiveType::LINE_STRIP, &RenderStates::DEFAULT);
        }
    }
}
