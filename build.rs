#[cfg(target_os = "windows")]
fn main() {
    use winresource::WindowsResource;

    // The icon is optional: only embed it when res/pacer.ico is present
    let mut res = WindowsResource::new();
    if std::path::Path::new("res/pacer.ico").exists() {
        res.set_icon("res/pacer.ico");
    }
    res.set("FileDescription", "Pacer CLI")
        .set("ProductName", "Pacer")
        .set("OriginalFilename", "pacer.exe")
        .set("FileVersion", env!("CARGO_PKG_VERSION"))
        .set("ProductVersion", env!("CARGO_PKG_VERSION"))
        .compile()
        .expect("Failed to embed version resource");
}

#[cfg(not(target_os = "windows"))]
fn main() {}
