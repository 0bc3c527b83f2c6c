use crate::model::{Footer, Page};

/// Legal notice printed at the bottom of every report page.
pub const DEFAULT_FOOTER: &str = "L’interprétation des résultats, la description de symptômes pouvant y être attachés, \
ainsi que les conseils alimentaires résultent de l’expertise Symp. \
Ces résultats ne doivent en aucun cas êtres utilisés en tant que diagnostic, soin médical \
ou traitement d’une quelconque maladie.";

fn expand(template: &str, page: usize, pages: usize) -> String {
    template
        .replace("{page}", &page.to_string())
        .replace("{pages}", &pages.to_string())
}

/// Attach the footer to every page not flagged `no_footer` and zero the
/// bottom margin of the block it follows. `{page}` and `{pages}` in the
/// template are numbered over footered pages only.
///
/// Pages that already carry a footer are left alone, so running the pass
/// twice does not stack footers. Returns the number of pages stamped.
pub fn stamp_footers(pages: &mut [Page], template: &str) -> usize {
    let total = pages.iter().filter(|p| !p.no_footer).count();
    let mut stamped = 0;

    for (number, page) in pages.iter_mut().filter(|p| !p.no_footer).enumerate() {
        if page.footer.is_some() {
            continue;
        }
        if let Some(last) = page.blocks.last_mut() {
            let block = &mut last.block;
            block.rendered_height = (block.rendered_height - block.margin_bottom).max(0.0);
            block.margin_bottom = 0.0;
        }
        page.footer = Some(Footer {
            text: expand(template, number + 1, total),
            page_number: number + 1,
        });
        stamped += 1;
    }

    log::debug!("footers: stamped {stamped} of {total} pages");
    stamped
}
