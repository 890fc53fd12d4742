// src/map/script.rs
//
// Browser side of the map adapters. Adapters record JS statements here and
// render them inside a loader that fetches the library with bounded retry.
use maud::{html, Markup, PreEscaped};
use serde::Serialize;

pub const BACKOFF_MS: u64 = 500;

/// Runtime shared by every adapter: library loader, failure banner,
/// marker registry, marker-click navigation and teardown.
pub const RUNTIME: &str = r#"(function () {
  var api = window.obraMaps = window.obraMaps || {};
  api.markers = {};
  api.map = null;

  api.fail = function (reason) {
    var banner = document.getElementById('map-error');
    if (banner) { banner.hidden = false; }
    var el = document.getElementById('map');
    if (el) { el.hidden = true; }
    var tab = document.querySelector('[data-tab="map"]');
    if (tab) { tab.classList.add('disabled'); tab.setAttribute('aria-disabled', 'true'); }
    if (window.console) { console.error('map unavailable:', reason); }
  };

  api.select = function (key) {
    var url = new URL(window.location.href);
    url.searchParams.set('selected', key);
    window.location.assign(url.toString());
  };
  window.onMarkerClick = api.select;

  api.removeMarker = function (key) {
    var marker = api.markers[key];
    if (marker) { marker.remove(); delete api.markers[key]; }
  };

  api.teardown = function () {
    Object.keys(api.markers).forEach(api.removeMarker);
    if (api.map) { api.map.remove(); api.map = null; }
  };

  api.load = function (src, integrity, globalName, attempts, backoffMs, done) {
    var tries = 0;
    (function attempt() {
      if (typeof window[globalName] !== 'undefined') { done(null); return; }
      tries += 1;
      var s = document.createElement('script');
      s.src = src;
      s.async = true;
      if (integrity) { s.integrity = integrity; s.crossOrigin = ''; }
      function retry(reason) {
        s.remove();
        if (tries >= attempts) { done(reason); } else { setTimeout(attempt, backoffMs); }
      }
      s.onload = function () {
        if (typeof window[globalName] !== 'undefined') { done(null); } else { retry(globalName + ' missing after load'); }
      };
      s.onerror = function () { retry('could not fetch ' + src); };
      document.head.appendChild(s);
    })();
  };
})();"#;

/// Where a mapping library's assets live.
#[derive(Debug, Clone, Copy)]
pub struct Library {
    pub js: &'static str,
    pub js_integrity: Option<&'static str>,
    pub css: &'static str,
    pub css_integrity: Option<&'static str>,
    /// Global the library script defines once loaded.
    pub global: &'static str,
}

/// Serialize a value for inlining in a `<script>` block.
pub fn js_value<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "null".to_string())
        .replace("</", "<\\/")
}

/// Statements recorded by an adapter, in call order.
#[derive(Debug, Default, Clone)]
pub struct ScriptBuffer {
    statements: Vec<String>,
}

impl ScriptBuffer {
    pub fn push(&mut self, statement: impl Into<String>) {
        self.statements.push(statement.into());
    }

    /// Loader call that runs the recorded statements once the library is in,
    /// and tears the map down when the page goes away.
    pub fn boot(&self, lib: &Library, attempts: u32) -> String {
        let body = self.statements.join("\n      ");
        format!(
            r#"window.obraMaps.load({src}, {integrity}, {global}, {attempts}, {BACKOFF_MS}, function (err) {{
  if (err) {{ window.obraMaps.fail(err); return; }}
  try {{
      {body}
  }} catch (e) {{
    window.obraMaps.teardown();
    window.obraMaps.fail(String(e));
    return;
  }}
  window.addEventListener('pagehide', window.obraMaps.teardown, {{ once: true }});
}});"#,
            src = js_value(lib.js),
            integrity = js_value(&lib.js_integrity),
            global = js_value(lib.global),
            attempts = attempts.max(1),
        )
    }

    pub fn render(&self, lib: &Library, provider: &str, attempts: u32) -> Markup {
        html! {
            link rel="stylesheet" href=(lib.css) integrity=[lib.css_integrity] crossorigin=[lib.css_integrity.map(|_| "")];
            (error_banner(LOAD_FAILED, false))
            div id="map" class="map-container" data-provider=(provider) {}
            script { (PreEscaped(RUNTIME)) }
            script { (PreEscaped(self.boot(lib, attempts))) }
        }
    }
}

const LOAD_FAILED: &str = "Não foi possível carregar o mapa. A lista continua disponível.";

/// Banner shown when the map cannot be used. Starts hidden when the browser
/// may still succeed.
pub fn error_banner(message: &str, visible: bool) -> Markup {
    html! {
        div id="map-error" class="alert alert-error" role="alert" hidden[!visible] {
            (message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIB: Library = Library {
        js: "https://cdn.example/lib.js",
        js_integrity: Some("sha256-abc"),
        css: "https://cdn.example/lib.css",
        css_integrity: None,
        global: "L",
    };

    #[test]
    fn js_value_cannot_close_the_script_tag() {
        let out = js_value("</script><script>alert(1)");
        assert!(!out.contains("</script>"));
    }

    #[test]
    fn boot_wraps_statements_in_loader() {
        let mut buf = ScriptBuffer::default();
        buf.push("first();");
        buf.push("second();");

        let js = buf.boot(&LIB, 3);

        assert!(js.contains(r#"load("https://cdn.example/lib.js", "sha256-abc", "L", 3, 500"#));
        let first = js.find("first();").unwrap();
        let second = js.find("second();").unwrap();
        assert!(first < second);
        assert!(js.contains("pagehide"));
    }

    #[test]
    fn render_emits_hidden_banner_and_container() {
        let html = ScriptBuffer::default().render(&LIB, "leaflet", 3).into_string();
        assert!(html.contains(r#"id="map""#));
        assert!(html.contains(r#"data-provider="leaflet""#));
        assert!(html.contains("hidden"));
        assert!(html.contains("window.onMarkerClick"));
    }
}
