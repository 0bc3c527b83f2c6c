mod block;

use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref};

use crate::error::Error;
use crate::fonts::{BODY_FONT, register_helvetica};
use crate::model::{Page, PrintTarget};

use block::{render_block, render_footer};

fn render_page(page: &Page, target: &PrintTarget) -> Content {
    let mut content = Content::new();
    let scale = target.scale();
    let x = target.margin;
    let width = target.content_width();
    let mut top = target.page_height - target.margin;

    for placed in &page.blocks {
        let height = placed.block.rendered_height * scale;
        render_block(&mut content, placed, x, top, width, height);
        top -= height;
    }

    if let Some(footer) = &page.footer {
        let footer_top = target.margin + target.footer_height;
        render_footer(&mut content, &footer.text, x, footer_top, width);
    }
    content
}

/// Render a paginated plan as a PDF preview, one PDF page per plan page.
pub fn render(pages: &[Page], target: &PrintTarget) -> Result<Vec<u8>, Error> {
    if target.capacity <= 0.0 || target.content_height() <= 0.0 {
        return Err(Error::InvalidReport(format!(
            "print target has no usable height (capacity {}, content {}pt)",
            target.capacity,
            target.content_height()
        )));
    }

    let t0 = std::time::Instant::now();
    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();
    let font_id = alloc();
    register_helvetica(&mut pdf, font_id);

    let n = pages.len();
    let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();

    for (i, page) in pages.iter().enumerate() {
        let raw = render_page(page, target).finish();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
        pdf.stream(content_ids[i], &compressed).filter(Filter::FlateDecode);
    }

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(n as i32);

    for i in 0..n {
        let mut page = pdf.page(page_ids[i]);
        page.media_box(Rect::new(0.0, 0.0, target.page_width, target.page_height))
            .parent(pages_id)
            .contents(content_ids[i]);
        page.resources().fonts().pair(Name(BODY_FONT), font_id);
    }

    log::info!(
        "PDF: {n} pages in {:.1}ms",
        t0.elapsed().as_secs_f64() * 1000.0
    );
    Ok(pdf.finish())
}
