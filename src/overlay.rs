use crate::constants::*;
use crate::dom;
use site_core::route::NAV_LINKS;
use site_core::{cause_for, DetailParams, Route};
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn show(document: &web::Document, id: &str) {
    if let Some(el) = document.get_element_by_id(id) {
        let cl = el.class_list();
        _ = cl.remove_1(HIDDEN_CLASS);
        // fallback for environments without CSS class
        _ = el.remove_attribute("style");
    }
}

#[inline]
pub fn hide(document: &web::Document, id: &str) {
    if let Some(el) = document.get_element_by_id(id) {
        let cl = el.class_list();
        _ = cl.add_1(HIDDEN_CLASS);
        // fallback
        _ = el.set_attribute("style", "display:none");
    }
}

/// Create the overlay elements the page does not provide.
pub fn build(document: &web::Document) -> anyhow::Result<()> {
    let nav = dom::ensure_element(document, "div", NAV_ID, NAV_CLASS)?;
    if nav.child_element_count() == 0 {
        for (route, label) in NAV_LINKS {
            let a = document
                .create_element("a")
                .map_err(|e| anyhow::anyhow!("{:?}", e))?
                .dyn_into::<web::HtmlAnchorElement>()
                .map_err(|e| anyhow::anyhow!("{:?}", e))?;
            a.set_href(route.path());
            a.set_text_content(Some(label));
            _ = a.set_attribute("data-route", route.path());
            nav.append_child(&a)
                .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        }
    }
    dom::ensure_element(document, "div", CAUSE_PANEL_ID, CAUSE_PANEL_CLASS)?;
    let watermark = dom::ensure_element(document, "div", WATERMARK_ID, "")?;
    _ = watermark.set_attribute("aria-hidden", "true");
    let loading = dom::ensure_element(document, "div", LOADING_ID, "")?;
    loading.set_text_content(Some(LOADING_TEXT));
    hide(document, LOADING_ID);
    Ok(())
}

/// Flag the nav link of `route` with the active class.
pub fn set_active_link(document: &web::Document, route: Route) {
    let Some(nav) = document.get_element_by_id(NAV_ID) else {
        return;
    };
    let links = nav.children();
    for i in 0..links.length() {
        if let Some(link) = links.item(i) {
            let is_active = link.get_attribute("data-route").as_deref() == Some(route.path());
            _ = if is_active {
                link.class_list().add_1(ACTIVE_CLASS)
            } else {
                link.class_list().remove_1(ACTIVE_CLASS)
            };
        }
    }
}

pub fn update_cause_panel(document: &web::Document, route: Route) -> anyhow::Result<()> {
    let Some(panel) = document.get_element_by_id(CAUSE_PANEL_ID) else {
        return Ok(());
    };
    let cause = cause_for(route);
    panel.set_text_content(None);
    let a = document
        .create_element("a")
        .map_err(|e| anyhow::anyhow!("{:?}", e))?
        .dyn_into::<web::HtmlAnchorElement>()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    a.set_href(cause.url);
    a.set_target("_blank");
    a.set_rel("noopener noreferrer");
    a.set_text_content(Some(cause.title));
    let p = document
        .create_element("p")
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    p.set_text_content(Some(cause.description));
    panel
        .append_child(&a)
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    panel
        .append_child(&p)
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    Ok(())
}

/// Transparent oversized copy of the status text behind the canvas.
pub fn update_watermark(document: &web::Document, route: Route, detail: &DetailParams) {
    if let Some(el) = document.get_element_by_id(WATERMARK_ID) {
        el.set_text_content(Some(route.status_text()));
        if let Ok(html) = el.dyn_into::<web::HtmlElement>() {
            let style = html.style();
            _ = style.set_property("font-size", &detail.watermark_font_css());
            _ = style.set_property("color", "transparent");
        }
    }
}

/// Mount the overlays that belong to `route` and unmount the rest.
pub fn apply_route(document: &web::Document, route: Route, detail: &DetailParams) {
    set_active_link(document, route);
    if route.shows_shape_overlays() {
        if let Err(e) = update_cause_panel(document, route) {
            log::warn!("[overlay] cause panel: {:?}", e);
        }
        update_watermark(document, route, detail);
        show(document, CAUSE_PANEL_ID);
        show(document, WATERMARK_ID);
    } else {
        hide(document, CAUSE_PANEL_ID);
        hide(document, WATERMARK_ID);
    }
}

pub fn show_loading(document: &web::Document) {
    if let Some(el) = document.get_element_by_id(LOADING_ID) {
        el.set_text_content(Some(LOADING_TEXT));
    }
    show(document, LOADING_ID);
}

pub fn show_loading_failed(document: &web::Document) {
    if let Some(el) = document.get_element_by_id(LOADING_ID) {
        el.set_text_content(Some(LOADING_FAILED_TEXT));
    }
    show(document, LOADING_ID);
}
