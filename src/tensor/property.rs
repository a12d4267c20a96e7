/*
 * @Author       : 老董
 * @Date         : 2023-10-21 03:22:26
 * @Description  : 本类仅包含一些属性方法，不包含任何运算方法，所以除`fill`外不会需要用到mut
 * @LastEditors  : 老董
 * @LastEditTime : 2026-10-12 10:24:10
 */

use super::Tensor;
use crate::errors::TensorError;
use ndarray::{Array, IxDyn};

impl Tensor {
    /// 若为向量，`shape`可以是[n]、[1,n]、[n,1]；
    /// 若为矩阵，`shape`可以是[n,m]；
    /// 若为更高维度的数组，`shape`可以是[c,n,m,...]。
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// 张量的维（dim）数、阶（rank）数
    /// 即`shape()`的元素个数--如：形状为`[]`的标量阶数为0，向量阶数为1，矩阵阶数为2，以此类推
    pub fn dimension(&self) -> usize {
        self.data.ndim()
    }

    /// 计算张量中所有元素的数量
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// 判断两个张量的形状是否严格一致。如：形状为 [1, 4]，[1, 4]和[4]是不一致的，会返回false
    pub fn is_same_shape(&self, other: &Self) -> bool {
        self.shape() == other.shape()
    }

    /// 底层ndarray数组的只读引用
    pub fn data(&self) -> &Array<f32, IxDyn> {
        &self.data
    }

    /// 按行优先（C order）展开为`Vec`
    pub fn to_vec(&self) -> Vec<f32> {
        self.data.iter().copied().collect()
    }

    /// 元素绝对值的最大值，空张量返回0
    pub fn max_abs(&self) -> f32 {
        self.data.iter().fold(0., |acc, x| acc.max(x.abs()))
    }

    /// 将所有元素设为`value`
    pub fn fill(&mut self, value: f32) {
        self.data.fill(value);
    }

    /// 返回改变形状后的新张量（元素个数须一致）
    pub fn reshape(&self, shape: &[usize]) -> Result<Self, TensorError> {
        Tensor::try_new(&self.to_vec(), shape)
    }
}
