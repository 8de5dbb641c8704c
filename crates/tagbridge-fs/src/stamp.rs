use std::fs::File;
use std::io;
use std::path::Path;
use std::time::SystemTime;

/// Marca el archivo como modificado ahora.
///
/// lofty conserva el mtime en algunos contenedores; después de escribir tags
/// lo forzamos para que el lado escrito quede como el más reciente.
pub fn touch_now(path: &Path) -> io::Result<()> {
  File::options().write(true).open(path)?.set_modified(SystemTime::now())
}
