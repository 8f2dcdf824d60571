//! Embedded allow-lists for unresolved-reference triage.
//!
//! A reference that resolves to no scope binding is only reported as
//! untracked when it is not a well-known global/window property, a JSX
//! intrinsic element name, or a standard JSX attribute name.

use phf::phf_set;

static WINDOW_PROPERTIES: phf::Set<&'static str> = phf_set! {
    "AbortController", "Array", "ArrayBuffer", "BigInt", "Blob", "Boolean",
    "CustomEvent", "DOMParser", "DataView", "Date", "Error", "EvalError",
    "Event", "EventTarget", "File", "FileReader", "Float32Array",
    "Float64Array", "FormData", "Function", "Headers", "Image", "Infinity",
    "Int16Array", "Int32Array", "Int8Array", "IntersectionObserver", "JSON",
    "Map", "Math", "MessageChannel", "MutationObserver", "NaN", "Number",
    "Object", "Promise", "Proxy", "RangeError", "ReferenceError", "Reflect",
    "RegExp", "Request", "ResizeObserver", "Response", "Set", "String",
    "Symbol", "SyntaxError", "TextDecoder", "TextEncoder", "TypeError",
    "URIError", "URL", "URLSearchParams", "Uint16Array", "Uint32Array",
    "Uint8Array", "Uint8ClampedArray", "WeakMap", "WeakRef", "WeakSet",
    "WebSocket", "Worker", "XMLHttpRequest", "__dirname", "__filename",
    "alert", "atob", "btoa", "cancelAnimationFrame", "clearInterval",
    "clearTimeout", "confirm", "console", "crypto", "decodeURI",
    "decodeURIComponent", "document", "encodeURI", "encodeURIComponent",
    "eval", "fetch", "getComputedStyle", "global", "globalThis", "history",
    "isFinite", "isNaN", "localStorage", "location", "matchMedia", "module",
    "navigator", "parseFloat", "parseInt", "performance", "process", "prompt",
    "queueMicrotask", "require", "requestAnimationFrame",
    "requestIdleCallback", "screen", "scrollTo", "sessionStorage",
    "setInterval", "setTimeout", "structuredClone", "undefined", "window",
};

static INTRINSIC_ELEMENTS: phf::Set<&'static str> = phf_set! {
    "a", "abbr", "address", "area", "article", "aside", "audio", "b", "base",
    "bdi", "bdo", "blockquote", "body", "br", "button", "canvas", "caption",
    "cite", "code", "col", "colgroup", "data", "datalist", "dd", "del",
    "details", "dfn", "dialog", "div", "dl", "dt", "em", "embed", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5",
    "h6", "head", "header", "hgroup", "hr", "html", "i", "iframe", "img",
    "input", "ins", "kbd", "label", "legend", "li", "link", "main", "map",
    "mark", "menu", "meta", "meter", "nav", "noscript", "object", "ol",
    "optgroup", "option", "output", "p", "picture", "pre", "progress", "q",
    "rp", "rt", "ruby", "s", "samp", "script", "section", "select", "slot",
    "small", "source", "span", "strong", "style", "sub", "summary", "sup",
    "svg", "table", "tbody", "td", "template", "textarea", "tfoot", "th",
    "thead", "time", "title", "tr", "track", "u", "ul", "var", "video", "wbr",
    // Common SVG children
    "circle", "clipPath", "defs", "ellipse", "g", "line", "linearGradient",
    "mask", "path", "pattern", "polygon", "polyline", "radialGradient",
    "rect", "stop", "text", "tspan", "use",
};

static STANDARD_ATTRIBUTES: phf::Set<&'static str> = phf_set! {
    "accept", "action", "allowFullScreen", "alt", "async", "autoComplete",
    "autoFocus", "autoPlay", "checked", "children", "className", "colSpan",
    "cols", "content", "contentEditable", "controls", "coords", "crossOrigin",
    "data", "dangerouslySetInnerHTML", "defaultChecked", "defaultValue",
    "defer", "dir", "disabled", "download", "draggable", "encType", "htmlFor",
    "href", "hidden", "id", "key", "lang", "loop", "max", "maxLength",
    "method", "min", "minLength", "multiple", "muted", "name", "noValidate",
    "onBlur", "onChange", "onClick", "onFocus", "onInput", "onKeyDown",
    "onKeyUp", "onMouseDown", "onMouseEnter", "onMouseLeave", "onMouseUp",
    "onScroll", "onSubmit", "open", "pattern", "placeholder", "poster",
    "preload", "readOnly", "ref", "rel", "required", "role", "rowSpan",
    "rows", "sandbox", "scope", "selected", "shape", "size", "span",
    "spellCheck", "src", "srcSet", "start", "step", "style", "tabIndex",
    "target", "title", "type", "useMap", "value", "width", "wrap",
};

pub fn is_window_property(name: &str) -> bool {
    WINDOW_PROPERTIES.contains(name)
}

pub fn is_intrinsic_element(name: &str) -> bool {
    INTRINSIC_ELEMENTS.contains(name)
}

pub fn is_standard_attribute(name: &str) -> bool {
    STANDARD_ATTRIBUTES.contains(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allow_list_membership() {
        assert!(is_window_property("window"));
        assert!(is_window_property("setTimeout"));
        assert!(!is_window_property("myLocalThing"));
        assert!(is_intrinsic_element("div"));
        assert!(!is_intrinsic_element("MyComponent"));
        assert!(is_standard_attribute("className"));
        assert!(!is_standard_attribute("myProp"));
    }
}
