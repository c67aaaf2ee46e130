//! Copying subtrees between filesystems of any backend.

use crate::{Error, PathType, ReadFileSystem, ReadWriteFileSystem};

/// Replicate the subtree at `src_path` in `src` under `dst_path` in `dst`.
///
/// Paths are translated one segment at a time through each side's codec, so
/// the two filesystems may use different path representations. Directories
/// are created, files are written with their resource; an absent source is
/// a no-op. Timestamps are not preserved: each write takes the destination's
/// current time.
pub fn copy<S, D>(src: &S, src_path: &S::Path, dst: &mut D, dst_path: &D::Path) -> Result<(), Error>
where
    S: ReadFileSystem + ?Sized,
    D: ReadWriteFileSystem + ?Sized,
{
    match src.type_of(src_path)? {
        None => Ok(()),
        Some(PathType::File) => {
            if let Some(resource) = src.resource(src_path)? {
                dst.update_resource(dst_path, resource.value)?;
            }
            Ok(())
        }
        Some(PathType::Directory) => {
            dst.create_dir(dst_path)?;
            for child in src.children(src_path)? {
                let name = src.name(&child);
                let dst_child = dst.make_path(dst_path, &name)?;
                copy(src, &child, dst, &dst_child)?;
            }
            Ok(())
        }
    }
}
