use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{Options, Tree};

/// Renders markup into a bitmap at its intrinsic size and encodes it as PNG.
pub(super) fn rasterize_png(markup: &str) -> Result<Vec<u8>, String> {
    let mut options = Options::default();
    options.fontdb_mut().load_system_fonts();

    let tree = Tree::from_str(markup, &options).map_err(|err| format!("parse svg tree: {err}"))?;
    let size = tree.size().to_int_size();
    let mut pixmap = Pixmap::new(size.width(), size.height())
        .ok_or_else(|| format!("cannot allocate {}x{} canvas", size.width(), size.height()))?;

    resvg::render(&tree, Transform::default(), &mut pixmap.as_mut());
    pixmap
        .encode_png()
        .map_err(|err| format!("encode png: {err}"))
}
