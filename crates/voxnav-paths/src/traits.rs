use voxnav_core::BlockPos;

/// Extra shape information for blocks whose collision box does not match
/// their grid cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Surface {
    /// A regular block: solid or not, nothing more to say.
    #[default]
    Plain,
    /// Fences and fence gates. Agents cannot stand on top of them, so the
    /// block above is treated as solid.
    Fence,
    /// Stationary liquid. The block below is treated as solid so routes do
    /// not dive under the surface.
    StillLiquid,
}

/// Read-only view of the voxel world consulted during a search.
///
/// Implementations are queried lazily as the frontier grows; a search
/// assumes the answers do not change while it runs.
pub trait VoxelWorld {
    /// Whether the region (chunk) owning `p` is loaded and valid.
    fn region_valid_at(&self, p: BlockPos) -> bool;

    /// Whether the block at `p` blocks movement. Only called for positions
    /// where [`region_valid_at`](Self::region_valid_at) returned `true`.
    fn solid_at(&self, p: BlockPos) -> bool;

    /// Shape hint for the block at `p`.
    fn surface_at(&self, _p: BlockPos) -> Surface {
        Surface::Plain
    }
}

impl<W: VoxelWorld + ?Sized> VoxelWorld for &W {
    fn region_valid_at(&self, p: BlockPos) -> bool {
        (**self).region_valid_at(p)
    }

    fn solid_at(&self, p: BlockPos) -> bool {
        (**self).solid_at(p)
    }

    fn surface_at(&self, p: BlockPos) -> Surface {
        (**self).surface_at(p)
    }
}
