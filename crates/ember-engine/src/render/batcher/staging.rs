use crate::render::RenderError;

/// CPU-side vertices and indices waiting for a combined upload.
///
/// Invariant: every staged index addresses a staged vertex. Each request's
/// local indices are rebased by the number of vertices staged before it.
#[derive(Debug, Clone)]
pub struct StagingBuffer<V> {
    vertices: Vec<V>,
    indices: Vec<u32>,
}

impl<V> Default for StagingBuffer<V> {
    fn default() -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }
}

impl<V: Copy> StagingBuffer<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one draw request.
    ///
    /// `indices` are local to `vertices` (zero-based). Nothing is staged when
    /// an index is out of range, or when the batch's vertex or index count
    /// would no longer fit a `u32`.
    pub fn push(&mut self, indices: &[u32], vertices: &[V]) -> Result<(), RenderError> {
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
            return Err(RenderError::IndexOutOfRange {
                index,
                vertex_count: vertices.len(),
            });
        }

        check_batch_size(
            self.vertices.len() + vertices.len(),
            self.indices.len() + indices.len(),
        )?;
        // Fits: every count staged so far passed the check above.
        let base = self.vertices.len() as u32;

        self.vertices.extend_from_slice(vertices);
        self.indices.extend(indices.iter().map(|&i| i + base));
        Ok(())
    }

    /// Drops staged data, keeping the allocations.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.indices.is_empty()
    }

    pub fn vertices(&self) -> &[V] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }
}

/// Both counts end up as `u32` in the draw call.
fn check_batch_size(vertex_count: usize, index_count: usize) -> Result<(), RenderError> {
    if u32::try_from(vertex_count).is_err() || u32::try_from(index_count).is_err() {
        return Err(RenderError::IndexOverflow {
            vertex_count,
            index_count,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAD: [u32; 6] = [0, 1, 3, 1, 2, 3];

    fn verts(n: usize) -> Vec<u8> {
        (0..n as u8).collect()
    }

    #[test]
    fn two_quads_are_rebased() {
        let mut staging = StagingBuffer::new();
        staging.push(&QUAD, &verts(4)).unwrap();
        staging.push(&QUAD, &verts(4)).unwrap();

        assert_eq!(staging.indices(), &[0, 1, 3, 1, 2, 3, 4, 5, 7, 5, 6, 7]);
        assert_eq!(staging.vertex_count(), 8);
    }

    #[test]
    fn rebase_offset_is_running_vertex_total() {
        let requests: [(&[u32], usize); 3] = [(&[0, 1, 2], 3), (&[4, 0], 5), (&[1, 0, 1], 2)];

        let mut staging = StagingBuffer::new();
        let mut expected = Vec::new();
        let mut offset = 0u32;
        for (indices, n) in requests {
            staging.push(indices, &verts(n)).unwrap();
            expected.extend(indices.iter().map(|i| i + offset));
            offset += n as u32;
        }

        assert_eq!(staging.indices(), expected.as_slice());
        assert_eq!(staging.vertex_count(), 10);
        assert!(staging.indices().iter().all(|&i| (i as usize) < staging.vertex_count()));
    }

    #[test]
    fn vertices_are_appended_in_call_order() {
        let mut staging = StagingBuffer::new();
        staging.push(&[0], &[7u8, 8]).unwrap();
        staging.push(&[0], &[9u8]).unwrap();
        assert_eq!(staging.vertices(), &[7, 8, 9]);
    }

    #[test]
    fn out_of_range_index_leaves_buffer_untouched() {
        let mut staging = StagingBuffer::new();
        staging.push(&QUAD, &verts(4)).unwrap();

        let err = staging.push(&[0, 1, 4], &verts(4)).unwrap_err();
        assert!(matches!(
            err,
            RenderError::IndexOutOfRange {
                index: 4,
                vertex_count: 4
            }
        ));
        assert_eq!(staging.indices(), &QUAD);
        assert_eq!(staging.vertex_count(), 4);
    }

    #[test]
    fn indices_without_vertices_are_rejected() {
        let mut staging = StagingBuffer::<u8>::new();
        assert!(staging.push(&[0], &[]).is_err());
        assert!(staging.is_empty());
    }

    #[test]
    fn empty_request_is_a_no_op() {
        let mut staging = StagingBuffer::<u8>::new();
        staging.push(&[], &[]).unwrap();
        assert!(staging.is_empty());
    }

    #[test]
    fn clear_resets_lengths_but_keeps_capacity() {
        let mut staging = StagingBuffer::new();
        staging.push(&QUAD, &verts(4)).unwrap();
        let capacity = staging.indices.capacity();

        staging.clear();
        assert!(staging.is_empty());
        assert_eq!(staging.vertex_count(), 0);
        assert_eq!(staging.indices.capacity(), capacity);
    }

    #[test]
    fn batch_size_is_bounded_on_both_counts() {
        let limit = u32::MAX as usize;
        assert!(check_batch_size(limit, limit).is_ok());
        assert!(matches!(
            check_batch_size(limit + 1, 6),
            Err(RenderError::IndexOverflow { vertex_count, .. }) if vertex_count == limit + 1
        ));
        // Few vertices reused by too many indices.
        assert!(matches!(
            check_batch_size(4, limit + 1),
            Err(RenderError::IndexOverflow { index_count, .. }) if index_count == limit + 1
        ));
    }
}
