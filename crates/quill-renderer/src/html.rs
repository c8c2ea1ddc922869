//! Default HTML rendering for overridable events.
//!
//! Used by [`RenderHooks`](crate::RenderHooks) when no hook is registered.

use std::fmt::Write;

use crate::hooks::{CodeBlockContext, CodeSpanContext, HeadingContext, ImageContext, LinkContext};
use crate::state::escape_html;

pub(crate) fn link(ctx: &LinkContext<'_>, out: &mut String) {
    write!(out, r#"<a href="{}""#, escape_html(ctx.href)).unwrap();
    if let Some(title) = ctx.title {
        write!(out, r#" title="{}""#, escape_html(title)).unwrap();
    }
    write!(out, ">{}</a>", ctx.text_html).unwrap();
}

pub(crate) fn image(ctx: &ImageContext<'_>, out: &mut String) {
    write!(
        out,
        r#"<img src="{}" alt="{}""#,
        escape_html(ctx.src),
        escape_html(ctx.alt)
    )
    .unwrap();
    if let Some(title) = ctx.title {
        write!(out, r#" title="{}""#, escape_html(title)).unwrap();
    }
    out.push('>');
}

pub(crate) fn code_block(ctx: &CodeBlockContext<'_>, out: &mut String) {
    if let Some(lang) = ctx.lang {
        write!(
            out,
            r#"<pre><code class="language-{}">{}</code></pre>"#,
            escape_html(lang),
            escape_html(ctx.code)
        )
        .unwrap();
    } else {
        write!(out, "<pre><code>{}</code></pre>", escape_html(ctx.code)).unwrap();
    }
}

pub(crate) fn code_span(ctx: &CodeSpanContext<'_>, out: &mut String) {
    write!(out, "<code>{}</code>", escape_html(ctx.code)).unwrap();
}

pub(crate) fn heading(ctx: &HeadingContext<'_>, out: &mut String) {
    write!(
        out,
        "<h{level}>{}</h{level}>",
        ctx.text_html.trim(),
        level = ctx.level
    )
    .unwrap();
}
