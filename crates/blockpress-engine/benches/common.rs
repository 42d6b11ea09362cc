// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_post_html(sections: usize) -> String {
    let base = concat!(
        "<h2 style=\"font-size:28px\">Section title</h2>\n",
        "<p style=\"font-size:16px\">Paragraph with <a href=\"https://example.com\">a link</a> &amp; some text.</p>\n",
        "<ul style=\"list-style-type:disc\"><li>First</li><li>Second</li><li>Third</li></ul>\n",
        "<blockquote>Quoted words.</blockquote>\n",
        "<div data-language=\"rust\"><pre><code>fn main() {\n    println!(\"hello\");\n}</code></pre></div>\n",
        "<table><tbody><tr><td>a</td><td>b</td></tr><tr><td>c</td><td>d</td></tr></tbody></table>\n",
        "<div><div style=\"display:inline-block\"><p>left</p></div><div style=\"display:inline-block\"><img src=\"r.png\"></div></div>\n",
        "<hr>\n",
    );
    base.repeat(sections)
}

#[allow(dead_code)]
pub fn generate_deeply_nested_html(depth: usize) -> String {
    let mut html = String::with_capacity(depth * 11);
    for _ in 0..depth {
        html.push_str("<div>");
    }
    html.push_str("deep");
    for _ in 0..depth {
        html.push_str("</div>");
    }
    html
}
